use tracing::instrument;

use super::Context;

pub struct Init;

impl Init {
    #[instrument(skip_all)]
    pub fn run(context: &Context) -> anyhow::Result<()> {
        let workspace = context.workspace();
        let created = workspace.init()?;

        println!("Initialized travel workspace in {}", workspace.root().display());
        for path in &created {
            let shown = path.strip_prefix(workspace.root()).unwrap_or(path);
            println!("  Created: {}", shown.display());
        }

        println!();
        println!("Next steps:");
        println!("  travel requests          # List travel requests");
        println!("  travel calendar          # Show the trip calendar");
        println!("  travel form --set location.ville=Lyon");

        Ok(())
    }
}
