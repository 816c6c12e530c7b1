use serde::{Deserialize, Serialize};
use std::fmt;

/// The three oil-degradation markers measured by the sensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    /// Free Fatty Acid, % (hydrolysis)
    Ffa,
    /// Total Polar Compounds, % (oxidative degradation)
    Tpc,
    /// Peroxide Value, meq/kg (early oxidation products)
    Pv,
}

impl Parameter {
    pub const ALL: [Parameter; 3] = [Parameter::Ffa, Parameter::Tpc, Parameter::Pv];

    pub fn short_name(&self) -> &'static str {
        match self {
            Parameter::Ffa => "FFA",
            Parameter::Tpc => "TPC",
            Parameter::Pv => "PV",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Parameter::Ffa => "Free Fatty Acid",
            Parameter::Tpc => "Total Polar Compounds",
            Parameter::Pv => "Peroxide Value",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::Ffa | Parameter::Tpc => "%",
            Parameter::Pv => "meq/kg",
        }
    }

    /// Decimal places used when a reading is shown to a person.
    pub fn precision(&self) -> usize {
        match self {
            Parameter::Ffa => 2,
            Parameter::Tpc | Parameter::Pv => 1,
        }
    }

    /// Formats a value at this parameter's precision, followed by its unit.
    pub fn format_value(&self, value: f64) -> String {
        format!("{:.*} {}", self.precision(), value, self.unit())
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// A single measured value alongside the regulatory limit it is judged against.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterReading {
    pub parameter: Parameter,
    pub value: f64,
    pub limit: f64,
}

impl ParameterReading {
    pub fn new(parameter: Parameter, value: f64, limit: f64) -> Self {
        Self {
            parameter,
            value,
            limit,
        }
    }

    pub fn name(&self) -> &'static str {
        self.parameter.display_name()
    }

    pub fn unit(&self) -> &'static str {
        self.parameter.unit()
    }

    /// Plain limit check used by the report table.
    pub fn within_limit(&self) -> bool {
        self.value <= self.limit
    }
}
