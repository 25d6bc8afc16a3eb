use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "nifscene")]
#[command(version)]
#[command(about = "Builds scene graphs from NetImmerse record tables and prints them")]
pub struct CliArgs {
    /// Also build the shapes below editor markers
    #[arg(long, env = "NIFSCENE_SHOW_MARKERS")]
    pub show_markers: bool,

    #[command(subcommand)]
    pub demo: Demo,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demo {
    /// A table with a lamp, a collision box and an editor marker
    Static,
    /// A body part skinned against a three bone skeleton
    Skinned {
        /// Load the skeleton first and bind the part to it, instead of loading the part static
        #[arg(long)]
        skeleton: bool,
    },
    /// A smoke fountain with a separate emitter node
    Particles,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_demo_and_flags() -> Result<(), anyhow::Error> {
        let args = CliArgs::try_parse_from(["nifscene", "--show-markers", "skinned", "--skeleton"])?;
        assert!(args.show_markers);
        assert_eq!(args.demo, Demo::Skinned { skeleton: true });

        let args = CliArgs::try_parse_from(["nifscene", "particles"])?;
        assert!(!args.show_markers);
        assert_eq!(args.demo, Demo::Particles);

        assert!(CliArgs::try_parse_from(["nifscene"]).is_err());
        Ok(())
    }
}
