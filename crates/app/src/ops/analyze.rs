use clap::Args;
use common::locator::{analyze, LocatorError};

#[derive(Args, Debug, Clone)]
pub struct Analyze {
    /// XOR-URL or publicName-URL to analyse
    pub url: String,

    /// Emit the report as JSON instead of labelled text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    Locator(#[from] LocatorError),
    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),
}

#[async_trait::async_trait]
impl crate::op::Op for Analyze {
    type Error = AnalyzeError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let report = analyze(&ctx.session, &self.url).await?;
        if self.json {
            Ok(serde_json::to_string_pretty(&report)?)
        } else {
            Ok(report.to_string().trim_end().to_string())
        }
    }
}
