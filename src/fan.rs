use log::warn;
use std::fmt;

/// Fan duty cycle as a percentage, always within 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DutyCycle(u8);

impl DutyCycle {
    pub const OFF: DutyCycle = DutyCycle(0);
    pub const FULL: DutyCycle = DutyCycle(100);

    /// Build a duty cycle, clamping anything above 100%
    pub fn from_percent(percent: u8) -> Self {
        if percent > 100 {
            warn!("Duty cycle {}% out of range, clamping to 100%", percent);
            return Self::FULL;
        }
        Self(percent)
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    /// Convert to the 0-255 PWM scale, rounding halves up (30% -> 77)
    pub fn to_pwm(self) -> u8 {
        // 255 * 100 + 50 fits in u16 and the quotient never exceeds 255
        ((u16::from(self.0) * 255 + 50) / 100) as u8
    }
}

impl fmt::Display for DutyCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Lower temperature bound of a step and the duty it selects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanStep {
    pub temp: f32,
    pub duty: DutyCycle,
}

impl FanStep {
    pub const fn new(temp: f32, duty: u8) -> Self {
        Self {
            temp,
            duty: DutyCycle(duty),
        }
    }
}

static QUIET_STEPS: [FanStep; 6] = [
    FanStep::new(60.0, 20),
    FanStep::new(65.0, 30),
    FanStep::new(70.0, 40),
    FanStep::new(75.0, 50),
    FanStep::new(80.0, 65),
    FanStep::new(85.0, 90),
];

/// Step table mapping temperature to fan duty, without hysteresis
#[derive(Debug, Clone, PartialEq)]
pub struct FanCurve {
    name: &'static str,
    base: DutyCycle,
    steps: &'static [FanStep],
}

impl FanCurve {
    /// Raspberry Pi 5 table tuned for quiet operation: off below 60°C, 90% from 85°C
    pub fn quiet() -> Self {
        Self {
            name: "Quiet",
            base: DutyCycle::OFF,
            steps: &QUIET_STEPS,
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    /// Duty for the highest step whose threshold is at or below `temperature`.
    ///
    /// Steps are sorted by temperature. Anything below the first step,
    /// including NaN, gets the base duty.
    pub fn duty_for_temperature(&self, temperature: f32) -> DutyCycle {
        self.steps
            .iter()
            .take_while(|step| temperature >= step.temp)
            .last()
            .map_or(self.base, |step| step.duty)
    }
}

impl Default for FanCurve {
    fn default() -> Self {
        Self::quiet()
    }
}
