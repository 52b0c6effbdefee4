use clap::Args;
use common::entries::{create_entries, EntriesFailure};

#[derive(Args, Debug, Clone)]
pub struct Create {
    /// Name owning the entry collection
    #[arg(long)]
    pub name: String,

    /// Numeric type tag of the collection
    #[arg(long)]
    pub type_tag: u64,

    /// JSON object of entries, e.g. '{"key": "value"}'
    #[arg(long)]
    pub payload: String,
}

#[async_trait::async_trait]
impl crate::op::Op for Create {
    type Error = EntriesFailure;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let outcome =
            create_entries(&ctx.session, &self.name, self.type_tag, &self.payload).await?;
        Ok(format!(
            "Created {} entries under '{}' (tag {}) at {}",
            outcome.count, outcome.name, outcome.type_tag, outcome.address
        ))
    }
}
