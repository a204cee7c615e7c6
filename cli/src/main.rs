//! mgrant — command-line front end for the local governance state cache.

mod config;
mod notify;
mod shutdown;
mod watch;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use mgrant_governance::{
    max_weight_for_budget, BatchVoteQueue, GovernanceCache, ProposalDraft, QueuedVote,
    SimulatedContractCaller,
};
use mgrant_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment, LmdbKvStore};
use mgrant_types::{
    Clock, DraftId, ProposalCategory, ProposalId, QueuedVoteId, ScheduledVoteId, Session,
    Timestamp, VoteType, WalletAddress,
};
use mgrant_utils::{format_amount, format_relative, LogFormat};

use crate::config::CliConfig;
use crate::notify::WebhookNotifier;
use crate::shutdown::ShutdownController;
use crate::watch::Watcher;

/// How long a stopping watch waits for webhook deliveries still in flight.
const NOTIFY_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "mgrant", about = "Local governance state for the micro-grants DAO")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// flags and env vars override them.
    #[arg(long, env = "MGRANT_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the local database.
    #[arg(long, env = "MGRANT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "MGRANT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "MGRANT_LOG_FORMAT")]
    log_format: Option<String>,

    /// Wallet address of the signed-in user (comment author).
    #[arg(long, env = "MGRANT_AUTHOR")]
    author: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Proposal drafts.
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },
    /// Proposal comment threads.
    Comment {
        #[command(subcommand)]
        action: CommentAction,
    },
    /// Scheduled votes.
    Vote {
        #[command(subcommand)]
        action: VoteAction,
    },
    /// Quadratic vote batches.
    Queue {
        #[command(subcommand)]
        action: QueueAction,
    },
    /// Check the local database for corruption.
    Check,
    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Subcommand)]
enum DraftAction {
    /// Create a draft or update fields of an existing one.
    Save {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Requested amount in tokens, e.g. "1500" or "12.5".
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        category: Option<ProposalCategory>,
    },
    /// List saved drafts.
    List,
    /// Show one draft and what blocks its submission.
    Show {
        #[arg(long)]
        id: String,
    },
    /// Delete a draft.
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand)]
enum CommentAction {
    /// Post a comment as the configured author.
    Add {
        #[arg(long)]
        proposal: String,
        #[arg(long)]
        text: String,
    },
    /// Show a proposal's thread, oldest first.
    List {
        #[arg(long)]
        proposal: String,
    },
}

#[derive(Subcommand)]
enum VoteAction {
    /// Schedule a vote for later execution.
    Schedule {
        #[arg(long)]
        proposal: String,
        #[arg(long)]
        vote: VoteType,
        /// Execute at this Unix timestamp (seconds).
        #[arg(long, conflicts_with = "in_minutes")]
        at: Option<u64>,
        /// Execute this many minutes from now.
        #[arg(long)]
        in_minutes: Option<u64>,
    },
    /// List scheduled votes with their countdowns.
    List {
        #[arg(long)]
        proposal: Option<String>,
    },
    /// Cancel a pending scheduled vote.
    Cancel {
        #[arg(long)]
        id: String,
    },
    /// Execute every due vote once.
    Execute,
    /// Keep executing due votes until interrupted.
    Watch {
        /// Seconds between passes (defaults to the config value).
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[derive(Subcommand)]
enum QueueAction {
    /// Price a batch of votes given as TITLE:WEIGHT.
    Cost {
        #[arg(long = "vote", required = true, value_parser = parse_queued)]
        votes: Vec<(String, u32)>,
        /// Credits available; reports the largest affordable single weight.
        #[arg(long)]
        budget: Option<u64>,
    },
}

fn parse_queued(raw: &str) -> Result<(String, u32), String> {
    let (title, weight) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("expected TITLE:WEIGHT, got '{raw}'"))?;
    let weight = weight
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid weight in '{raw}': {e}"))?;
    Ok((title.trim().to_string(), weight))
}

/// The wallet session, as far as the command line knows it.
struct CliSession {
    address: Option<WalletAddress>,
}

impl Session for CliSession {
    fn address(&self) -> Option<WalletAddress> {
        self.address.clone()
    }
}

type Cache = GovernanceCache<LmdbKvStore>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config.as_deref() {
        Some(path) => CliConfig::from_toml_file(path)?,
        None => CliConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if cli.author.is_some() {
        config.author = cli.author;
    }

    let log_format: LogFormat = config.log_format.parse().map_err(anyhow::Error::msg)?;
    mgrant_utils::init_tracing(&config.log_level, log_format);
    if let Some(path) = cli.config.as_deref() {
        tracing::debug!("loaded config from {}", path.display());
    }
    if let Command::Config = cli.command {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    check_data_dir(&config.data_dir).map_err(anyhow::Error::msg)?;
    let env = LmdbEnvironment::open(&config.data_dir, config.map_size_bytes())
        .with_context(|| format!("opening database at {}", config.data_dir.display()))?;
    let cache = GovernanceCache::open(env.kv_store()).with_contract(config.contract.clone());

    let session = CliSession {
        address: config
            .author
            .as_deref()
            .map(WalletAddress::parse)
            .transpose()?,
    };

    match cli.command {
        Command::Draft { action } => run_draft(&cache, action)?,
        Command::Comment { action } => run_comment(&cache, &session, action)?,
        Command::Vote { action } => run_vote(&cache, &config, action).await?,
        Command::Queue { action } => run_queue(action)?,
        Command::Config => {}
        Command::Check => {
            let report = check_integrity(&env)?;
            println!("{} entries checked", report.total_entries);
            for error in &report.errors {
                println!("  error: {error}");
            }
            if !report.is_healthy() {
                bail!("database integrity check failed");
            }
        }
    }

    if cache.is_degraded() {
        tracing::warn!("some changes could not be written to disk and were lost on exit");
    }
    Ok(())
}

fn run_draft(cache: &Cache, action: DraftAction) -> anyhow::Result<()> {
    let drafts = cache.drafts();
    match action {
        DraftAction::Save {
            id,
            title,
            description,
            amount,
            category,
        } => {
            let id = DraftId::new(id)?;
            let base = drafts.get(&id).unwrap_or_else(|| ProposalDraft::new(id));
            let draft = ProposalDraft {
                title: title.unwrap_or(base.title),
                description: description.unwrap_or(base.description),
                amount: amount.unwrap_or(base.amount),
                category: category.or(base.category),
                ..base
            };
            let (saved, outcome) = drafts.save(draft)?;
            println!("{:?} draft {}", outcome, saved.id);
        }
        DraftAction::List => {
            let now = cache.clock().now();
            for draft in drafts.list() {
                let amount = draft
                    .amount_micro()
                    .map(format_amount)
                    .unwrap_or_else(|| "-".to_string());
                let category = draft.category.map(|c| c.label()).unwrap_or("-");
                println!(
                    "{}\t{}\t{}\t{}\tsaved {}",
                    draft.id,
                    draft.title,
                    amount,
                    category,
                    format_relative(draft.last_saved, now)
                );
            }
        }
        DraftAction::Show { id } => {
            let id = DraftId::new(id)?;
            let Some(draft) = drafts.get(&id) else {
                bail!("draft {id} not found");
            };
            println!("{}", serde_json::to_string_pretty(&draft)?);
            let issues = draft.submission_issues();
            if issues.is_empty() {
                println!("ready to submit");
            }
            for issue in issues {
                println!("  blocked: {issue:?}");
            }
        }
        DraftAction::Delete { id } => {
            let id = DraftId::new(id)?;
            if drafts.delete(&id)? {
                println!("deleted draft {id}");
            } else {
                println!("no draft {id}");
            }
        }
    }
    Ok(())
}

fn run_comment(cache: &Cache, session: &impl Session, action: CommentAction) -> anyhow::Result<()> {
    let comments = cache.comments();
    match action {
        CommentAction::Add { proposal, text } => {
            let proposal = ProposalId::new(proposal)?;
            let author = session.address();
            let comment = comments.add(&proposal, author.as_ref(), &text)?;
            println!("added comment {} to proposal {}", comment.id, proposal);
        }
        CommentAction::List { proposal } => {
            let proposal = ProposalId::new(proposal)?;
            let now = cache.clock().now();
            for comment in comments.list(&proposal) {
                println!("[{}] {}: {}", comment.age(now), comment.author.short(), comment.text);
            }
        }
    }
    Ok(())
}

async fn run_vote(cache: &Cache, config: &CliConfig, action: VoteAction) -> anyhow::Result<()> {
    let ledger = cache.schedule();
    match action {
        VoteAction::Schedule {
            proposal,
            vote,
            at,
            in_minutes,
        } => {
            let now = cache.clock().now();
            let execution_time = match (at, in_minutes) {
                (Some(at), _) => Timestamp::new(at),
                (None, Some(minutes)) => now.plus_secs(minutes.saturating_mul(60)),
                (None, None) => bail!("one of --at or --in-minutes is required"),
            };
            let scheduled = ledger.schedule(&ProposalId::new(proposal)?, vote, execution_time)?;
            println!("scheduled {} ({})", scheduled.id, ledger.countdown(&scheduled));
        }
        VoteAction::List { proposal } => {
            let votes = match proposal {
                Some(p) => ledger.list(&ProposalId::new(p)?),
                None => ledger.list_all(),
            };
            for vote in votes {
                println!(
                    "{}\tproposal {}\t{}\t{}",
                    vote.id,
                    vote.proposal_id,
                    vote.vote_type,
                    ledger.countdown(&vote)
                );
            }
        }
        VoteAction::Cancel { id } => {
            let cancelled = ledger.cancel(&ScheduledVoteId::new(id)?)?;
            println!("cancelled {} on proposal {}", cancelled.id, cancelled.proposal_id);
        }
        VoteAction::Execute => {
            let caller = SimulatedContractCaller::new();
            for report in ledger.execute_due(&caller)? {
                match report.outcome {
                    Ok(tx_id) => println!("{} executed: {}", report.vote_id, tx_id),
                    Err(e) => println!("{} failed: {}", report.vote_id, e),
                }
            }
        }
        VoteAction::Watch { interval } => {
            let interval = Duration::from_secs(interval.unwrap_or(config.watch_interval_secs).max(1));
            let caller = SimulatedContractCaller::new();
            let notifier = config.webhook_url.as_deref().map(WebhookNotifier::new);

            let controller = Arc::new(ShutdownController::new());
            let rx = controller.subscribe();
            let signals = Arc::clone(&controller);
            tokio::spawn(async move { signals.stop_on_signal().await });

            Watcher::new(cache, &caller, notifier.as_ref())
                .run(interval, rx)
                .await;
            if let Some(notifier) = &notifier {
                notifier.drain(NOTIFY_DRAIN_TIMEOUT).await;
            }
        }
    }
    Ok(())
}

fn run_queue(action: QueueAction) -> anyhow::Result<()> {
    match action {
        QueueAction::Cost { votes, budget } => {
            let mut queue = BatchVoteQueue::new();
            for (i, (title, weight)) in votes.into_iter().enumerate() {
                queue.add(QueuedVote {
                    id: QueuedVoteId::new(format!("q{}", i + 1))?,
                    title,
                    weight,
                })?;
            }
            for vote in queue.iter() {
                println!("{}\tweight {}\tcost {}", vote.title, vote.weight, vote.cost());
            }
            println!("total cost: {}", queue.total_cost());
            if let Some(budget) = budget {
                let total = queue.total_cost();
                if total > budget {
                    println!("over budget by {}", total - budget);
                }
                println!("max single weight for {budget}: {}", max_weight_for_budget(budget));
            }
        }
    }
    Ok(())
}
