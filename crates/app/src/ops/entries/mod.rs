use clap::{Args, Subcommand};

pub mod create;
pub mod list;

use crate::op::Op;

crate::command_enum! {
    (Create, create::Create),
    (List, list::List),
}

// Rename the generated Command to EntriesCommand for clarity
pub type EntriesCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Entries {
    #[command(subcommand)]
    pub command: EntriesCommand,
}

#[async_trait::async_trait]
impl Op for Entries {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
