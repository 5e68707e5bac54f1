use clap::ValueEnum;
use renoscope_engine::{CoreSystem, LivingSpace, Relationship};

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum RelationshipFlag {
    Buying,
    Living,
    Investing,
}

impl RelationshipFlag {
    pub(crate) const fn as_domain(self) -> Relationship {
        match self {
            RelationshipFlag::Buying => Relationship::Buying,
            RelationshipFlag::Living => Relationship::Living,
            RelationshipFlag::Investing => Relationship::Investing,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum CoreSystemFlag {
    Roofing,
    Hvac,
    Plumbing,
    Electrical,
    Foundation,
}

impl CoreSystemFlag {
    pub(crate) const fn as_domain(self) -> CoreSystem {
        match self {
            CoreSystemFlag::Roofing => CoreSystem::Roofing,
            CoreSystemFlag::Hvac => CoreSystem::Hvac,
            CoreSystemFlag::Plumbing => CoreSystem::Plumbing,
            CoreSystemFlag::Electrical => CoreSystem::Electrical,
            CoreSystemFlag::Foundation => CoreSystem::Foundation,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum LivingSpaceFlag {
    Kitchen,
    Bathroom,
    Flooring,
    Paint,
}

impl LivingSpaceFlag {
    pub(crate) const fn as_domain(self) -> LivingSpace {
        match self {
            LivingSpaceFlag::Kitchen => LivingSpace::Kitchen,
            LivingSpaceFlag::Bathroom => LivingSpace::Bathroom,
            LivingSpaceFlag::Flooring => LivingSpace::Flooring,
            LivingSpaceFlag::Paint => LivingSpace::Paint,
        }
    }
}
