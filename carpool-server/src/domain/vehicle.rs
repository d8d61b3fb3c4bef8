//! Vehicle registration types.

use std::fmt;

use serde::{Serialize, Serializer};

/// Error returned when parsing an invalid registration number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid vehicle number: {reason}")]
pub struct InvalidVehicleNumber {
    reason: &'static str,
}

/// A registration plate in the `AA00AA0000` layout.
///
/// Two letters (state), two digits (district), two letters (series) and
/// four digits. Any `VehicleNumber` value is valid by construction.
///
/// # Examples
///
/// ```
/// use carpool_server::domain::VehicleNumber;
///
/// let plate = VehicleNumber::parse("KA09DX1234").unwrap();
/// assert_eq!(plate.as_str(), "KA09DX1234");
///
/// // User input is normalised first
/// let plate = VehicleNumber::parse_normalized("ka 09 dx 1234").unwrap();
/// assert_eq!(plate.as_str(), "KA09DX1234");
///
/// assert!(VehicleNumber::parse("KA9DX1234").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct VehicleNumber([u8; 10]);

const LAYOUT: [Slot; 10] = [
    Slot::Letter,
    Slot::Letter,
    Slot::Digit,
    Slot::Digit,
    Slot::Letter,
    Slot::Letter,
    Slot::Digit,
    Slot::Digit,
    Slot::Digit,
    Slot::Digit,
];

#[derive(Clone, Copy)]
enum Slot {
    Letter,
    Digit,
}

impl VehicleNumber {
    /// Parse an already-normalised registration number.
    ///
    /// The input must be exactly ten characters of uppercase letters and
    /// digits in the plate layout.
    pub fn parse(s: &str) -> Result<Self, InvalidVehicleNumber> {
        let bytes = s.as_bytes();

        let Ok(plate) = <[u8; 10]>::try_from(bytes) else {
            return Err(InvalidVehicleNumber {
                reason: "must be exactly 10 characters",
            });
        };

        for (b, slot) in plate.iter().zip(LAYOUT) {
            let ok = match slot {
                Slot::Letter => b.is_ascii_uppercase(),
                Slot::Digit => b.is_ascii_digit(),
            };
            if !ok {
                return Err(InvalidVehicleNumber {
                    reason: "expected layout like KA09DX1234",
                });
            }
        }

        Ok(VehicleNumber(plate))
    }

    /// Uppercase and strip whitespace before parsing.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidVehicleNumber> {
        let cleaned: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        Self::parse(&cleaned)
    }

    /// Returns the registration as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII letters and digits are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Debug for VehicleNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VehicleNumber({})", self.as_str())
    }
}

impl fmt::Display for VehicleNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for VehicleNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
