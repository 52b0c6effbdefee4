use clap::Args;
use common::remap::{remap, RemapFailure};

#[derive(Args, Debug, Clone)]
pub struct Remap {
    /// Public name owning the sub-name mapping
    #[arg(long)]
    pub public_name: String,

    /// Sub-name to rebind
    #[arg(long)]
    pub sub_name: String,

    /// Locator of the target service (XOR-URL or publicName-URL)
    #[arg(long)]
    pub url: String,
}

#[async_trait::async_trait]
impl crate::op::Op for Remap {
    type Error = RemapFailure;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let outcome = remap(&ctx.session, &self.public_name, &self.sub_name, &self.url).await?;
        Ok(format!(
            "Successfully remapped 'safe://{}.{}' to the location targeted by '{}' (version {})",
            outcome.sub_name, outcome.public_name, outcome.target_locator, outcome.version
        ))
    }
}
