use crate::error::XCError;
use std::fmt;
use std::str::FromStr;

/// Spin treatment of a kernel, fixed when the kernel is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spin {
    Unpolarized,
    Polarized,
}

impl Spin {
    /// Number of density channels per grid point.
    pub fn nspin(self) -> usize {
        match self {
            Spin::Unpolarized => 1,
            Spin::Polarized => 2,
        }
    }

    /// Number of contracted-gradient components per grid point (uu, ud, dd).
    pub fn nsigma(self) -> usize {
        match self {
            Spin::Unpolarized => 1,
            Spin::Polarized => 3,
        }
    }

    pub fn is_polarized(self) -> bool {
        self == Spin::Polarized
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Spin::Unpolarized => "nonspin",
            Spin::Polarized => "spin",
        }
    }
}

impl FromStr for Spin {
    type Err = XCError;

    fn from_str(scheme: &str) -> Result<Self, Self::Err> {
        match scheme {
            "nonspin" => Ok(Spin::Unpolarized),
            "spin" => Ok(Spin::Polarized),
            _ => Err(XCError::UnknownSpinScheme(scheme.to_string())),
        }
    }
}

impl fmt::Display for Spin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&control::Control> for Spin {
    fn from(control: &control::Control) -> Self {
        if control.is_spin() {
            Spin::Polarized
        } else {
            Spin::Unpolarized
        }
    }
}
