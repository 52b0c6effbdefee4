use clap::Args;
use common::entries::{list_entries, EntriesFailure};

#[derive(Args, Debug, Clone)]
pub struct List {
    /// Name owning the entry collection
    #[arg(long)]
    pub name: String,

    /// Numeric type tag of the collection
    #[arg(long)]
    pub type_tag: u64,

    /// Keys to inspect (every key when omitted)
    #[arg(long = "key")]
    pub keys: Vec<String>,
}

#[async_trait::async_trait]
impl crate::op::Op for List {
    type Error = EntriesFailure;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let report = list_entries(&ctx.session, &self.name, self.type_tag, &self.keys).await?;
        Ok(report.to_string().trim_end().to_string())
    }
}
