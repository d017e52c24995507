/// All commands need to have this trait which gives the address of the command
/// which needs to be send via SPI with activated CommandsPin (Data/Command Pin in CommandMode)
pub(crate) trait Command: Copy {
    fn address(self) -> u8;
}

/// Raw command codes, as typed in by an operator
impl Command for u8 {
    fn address(self) -> u8 {
        self
    }
}
