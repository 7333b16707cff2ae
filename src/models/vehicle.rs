use serde::Serialize;

/// An entry in the operator's fleet as offered on the booking form.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Vehicle {
    pub id: &'static str,
    pub name: &'static str,
    pub driver: &'static str,
}

pub const FLEET: &[Vehicle] = &[
    Vehicle {
        id: "pickup-1",
        name: "Pickup Truck",
        driver: "Mukesh",
    },
    Vehicle {
        id: "pickup-2",
        name: "Pickup Truck",
        driver: "Jainul",
    },
    Vehicle {
        id: "pickup-3",
        name: "Pickup Truck",
        driver: "Hazrat",
    },
    Vehicle {
        id: "innova",
        name: "Innova Crysta",
        driver: "Sukumar Ruj",
    },
    Vehicle {
        id: "tractor",
        name: "Mahindra Tractor",
        driver: "Manjhalo",
    },
];
