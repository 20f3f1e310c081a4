use clap::Subcommand;
use reveille_core::{Config, Outcome, StatusLedger};

#[derive(Subcommand)]
pub enum LedgerAction {
    /// Print one user's full history
    Show {
        /// User identifier
        user: String,
    },
    /// Dump the whole ledger as JSON
    All,
    /// Per-user confirmed/failed counts
    Summary,
}

pub fn run(action: LedgerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let ledger = StatusLedger::open(config.ledger_path()?)?;

    match action {
        LedgerAction::Show { user } => {
            let history = ledger.read(&user)?;
            if history.is_empty() {
                println!("no records for {user}");
                return Ok(());
            }
            for record in history {
                println!(
                    "{}  {}  (recorded {})",
                    record.date,
                    record.outcome,
                    record.recorded_at.format("%Y-%m-%dT%H:%M:%SZ")
                );
            }
        }
        LedgerAction::All => {
            let all = ledger.read_all()?;
            println!("{}", serde_json::to_string_pretty(&all)?);
        }
        LedgerAction::Summary => {
            let all = ledger.read_all()?;
            let mut users: Vec<_> = all.iter().collect();
            users.sort_by_key(|(user, _)| user.clone());
            for (user, history) in users {
                let confirmed = history
                    .iter()
                    .filter(|r| r.outcome == Outcome::Confirmed)
                    .count();
                let failed = history
                    .iter()
                    .filter(|r| r.outcome == Outcome::Failed)
                    .count();
                println!(
                    "{user}: {confirmed} confirmed, {failed} failed, {} total",
                    history.len()
                );
            }
        }
    }
    Ok(())
}
