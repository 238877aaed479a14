use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Integer range the interactive controls are bounded to. Callers clamp
/// before touching the model; the model itself accepts any value.
pub const CONTROL_RANGE: RangeInclusive<i32> = -500..=500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coefficient {
    K1,
    K2,
    K3,
    P1,
    P2,
}

impl Coefficient {
    pub const ALL: [Coefficient; 5] = [
        Coefficient::K1,
        Coefficient::K2,
        Coefficient::K3,
        Coefficient::P1,
        Coefficient::P2,
    ];

    /// Physical value of one unit of control movement.
    pub fn step(self) -> f64 {
        match self {
            Coefficient::K1 => 1.0e-7,
            Coefficient::K2 => 1.0e-12,
            Coefficient::K3 => 1.0e-16,
            Coefficient::P1 => 1.0e-6,
            Coefficient::P2 => 1.0e-6,
        }
    }
}

/// Radial (k1, k2, k3) and tangential (p1, p2) lens distortion.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DistortionCoefficients {
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
    pub p1: f64,
    pub p2: f64,
}

impl DistortionCoefficients {
    pub fn new() -> Self {
        DistortionCoefficients::default()
    }

    /// Stores `control * step` for the given coefficient. Out-of-range
    /// controls produce out-of-range physical values and are accepted as-is.
    pub fn set_from_control(&mut self, coefficient: Coefficient, control: i32) {
        *self.value_mut(coefficient) = f64::from(control) * coefficient.step();
    }

    pub fn to_control_value(&self, coefficient: Coefficient) -> i32 {
        // the multiply/divide pair leaves ulp noise on the quotient;
        // nearest integer restores the control exactly, truncation loses it
        (self.value(coefficient) / coefficient.step()).round() as i32
    }

    pub fn apply_controls(&mut self, controls: ControlSnapshot) {
        self.set_from_control(Coefficient::K1, controls.k1);
        self.set_from_control(Coefficient::K2, controls.k2);
        self.set_from_control(Coefficient::K3, controls.k3);
        self.set_from_control(Coefficient::P1, controls.p1);
        self.set_from_control(Coefficient::P2, controls.p2);
    }

    pub fn controls(&self) -> ControlSnapshot {
        ControlSnapshot {
            k1: self.to_control_value(Coefficient::K1),
            k2: self.to_control_value(Coefficient::K2),
            k3: self.to_control_value(Coefficient::K3),
            p1: self.to_control_value(Coefficient::P1),
            p2: self.to_control_value(Coefficient::P2),
        }
    }

    /// Zeroes the coefficients; steps are fixed and unaffected.
    pub fn reset(&mut self) {
        *self = DistortionCoefficients::default();
    }

    /// The five values in the order the remap expects: k3 comes last.
    pub fn as_vector(&self) -> [f64; 5] {
        [self.k1, self.k2, self.p1, self.p2, self.k3]
    }

    pub fn is_finite(&self) -> bool {
        self.as_vector().iter().all(|value| value.is_finite())
    }

    fn value(&self, coefficient: Coefficient) -> f64 {
        match coefficient {
            Coefficient::K1 => self.k1,
            Coefficient::K2 => self.k2,
            Coefficient::K3 => self.k3,
            Coefficient::P1 => self.p1,
            Coefficient::P2 => self.p2,
        }
    }

    fn value_mut(&mut self, coefficient: Coefficient) -> &mut f64 {
        match coefficient {
            Coefficient::K1 => &mut self.k1,
            Coefficient::K2 => &mut self.k2,
            Coefficient::K3 => &mut self.k3,
            Coefficient::P1 => &mut self.p1,
            Coefficient::P2 => &mut self.p2,
        }
    }
}

/// The five control integers as edited by the user, decoupled from their
/// physical values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSnapshot {
    pub k1: i32,
    pub k2: i32,
    pub k3: i32,
    pub p1: i32,
    pub p2: i32,
}

impl fmt::Display for ControlSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "k1 = {} / k2 = {} / k3 = {} / p1 = {} / p2 = {}",
            self.k1, self.k2, self.k3, self.p1, self.p2
        )
    }
}
