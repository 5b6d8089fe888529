use cosmwasm_schema::cw_serde;

/// Lifecycle status of the current raffle round.
#[cw_serde]
#[derive(Copy)]
pub enum RaffleStatus {
    /// Accepting entries.
    Open,
    /// A randomness request is outstanding; entries are frozen.
    Calculating,
}

impl RaffleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RaffleStatus::Open => "open",
            RaffleStatus::Calculating => "calculating",
        }
    }
}

impl std::fmt::Display for RaffleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
