use {
    clap::Parser,
    std::{num::ParseFloatError, path::PathBuf, time::Duration},
    url::Url,
};

#[derive(Parser)]
pub struct Arguments {
    /// Address table driving the deployment. Updated in place as each
    /// contract deployment completes.
    #[clap(long, env, default_value = "deploy.json")]
    pub config: PathBuf,

    /// Directory holding the pre-compiled contract artifacts.
    #[clap(long, env, default_value = "build/contracts")]
    pub artifacts: PathBuf,

    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Maximum time in seconds to wait for a transaction receipt
    /// before giving up on the run.
    #[clap(
        long,
        env,
        default_value = "600",
        value_parser = duration_from_seconds,
    )]
    pub receipt_timeout: Duration,
}

pub fn duration_from_seconds(s: &str) -> Result<Duration, ParseFloatError> {
    Ok(Duration::from_secs_f32(s.parse()?))
}

impl std::fmt::Display for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "config: {:?}", self.config)?;
        writeln!(f, "artifacts: {:?}", self.artifacts)?;
        writeln!(f, "node_url: {}", self.node_url)?;
        writeln!(f, "receipt_timeout: {:?}", self.receipt_timeout)?;
        Ok(())
    }
}
