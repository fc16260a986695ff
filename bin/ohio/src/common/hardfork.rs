use clap::ValueEnum;
use ohio_sim::revm::primitives::hardfork::SpecId;

/// Hardfork selectable on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Hardfork {
    /// Berlin
    Berlin,
    /// London
    London,
    /// Paris (the merge)
    #[value(alias = "merge")]
    Paris,
    /// Shanghai
    Shanghai,
    /// Cancun
    Cancun,
    /// Prague
    #[default]
    Prague,
}

impl From<Hardfork> for SpecId {
    fn from(hardfork: Hardfork) -> Self {
        match hardfork {
            Hardfork::Berlin => Self::BERLIN,
            Hardfork::London => Self::LONDON,
            Hardfork::Paris => Self::MERGE,
            Hardfork::Shanghai => Self::SHANGHAI,
            Hardfork::Cancun => Self::CANCUN,
            Hardfork::Prague => Self::PRAGUE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("london", SpecId::LONDON)]
    #[case("merge", SpecId::MERGE)]
    #[case("prague", SpecId::PRAGUE)]
    fn test_parse_hardfork(#[case] name: &str, #[case] spec: SpecId) {
        let hardfork = Hardfork::from_str(name, true).unwrap();
        assert_eq!(SpecId::from(hardfork), spec);
    }
}
