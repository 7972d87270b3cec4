use crate::error::ConvertError;
use crate::i18n;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlState {
    #[default]
    Idle,
    Converting,
}

/// State of the convert button: Idle -> Converting -> Idle.
///
/// Clicks while converting are dropped, not queued.
#[derive(Debug, Default)]
pub struct ConvertControl {
    state: ControlState,
}

impl ConvertControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn is_converting(&self) -> bool {
        self.state == ControlState::Converting
    }

    pub fn try_begin(&mut self) -> Result<(), ConvertError> {
        match self.state {
            ControlState::Idle => {
                self.state = ControlState::Converting;
                Ok(())
            }
            ControlState::Converting => Err(ConvertError::Busy),
        }
    }

    pub fn finish(&mut self) {
        self.state = ControlState::Idle;
    }

    pub fn label(&self) -> String {
        match self.state {
            ControlState::Idle => i18n::t("convert"),
            ControlState::Converting => i18n::t("converting"),
        }
    }

    pub fn enabled(&self) -> bool {
        self.state == ControlState::Idle
    }
}
