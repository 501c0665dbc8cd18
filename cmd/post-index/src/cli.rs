//! Command line surface and query dispatch.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use domains::{Direction, PageCursor, PostId, PostRef, TopicId, UserId};
use services::PostService;
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[command(name = "post-index")]
#[command(about = "Rank, page and hydrate forum posts")]
#[command(version)]
pub struct Cli {
    /// Directory holding default.toml / local.toml
    #[arg(long, env = "POST_INDEX_CONFIG_DIR", default_value = "config")]
    pub config_dir: PathBuf,

    /// JSON seed file for the in-memory backend (overrides backend.seed_file)
    #[arg(long)]
    pub seed: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check whether posts exist
    Exists {
        #[arg(required = true)]
        pids: Vec<u64>,
    },
    /// List post ids in a slice of a container
    Pids {
        set: String,
        start: String,
        stop: String,
        #[arg(long)]
        reverse: bool,
    },
    /// Hydrate posts through the parser and plugin hooks
    Posts {
        #[arg(required = true)]
        pids: Vec<u64>,
        #[arg(long, default_value_t = 0)]
        viewer: u64,
    },
    /// Hydrate posts of one topic and redact them for a viewer
    Topic {
        tid: u64,
        #[arg(required = true)]
        pids: Vec<u64>,
        #[arg(long, default_value_t = 0)]
        viewer: u64,
    },
    /// Newest-first summaries from a container, one page at a time
    Summaries {
        set: String,
        start: String,
        stop: String,
        #[arg(long, default_value_t = 0)]
        viewer: u64,
    },
    /// 1-based position of one post under a sort mode
    Index {
        pid: u64,
        tid: u64,
        #[arg(long, default_value = "oldest_to_newest")]
        mode: String,
    },
    /// 1-based positions of many posts under the viewer's sort preference
    Indices {
        /// Posts as `pid:tid`
        #[arg(required = true, value_parser = parse_post_ref)]
        posts: Vec<PostRef>,
        #[arg(long, default_value_t = 0)]
        viewer: u64,
    },
}

fn parse_post_ref(raw: &str) -> Result<PostRef, String> {
    let (pid, tid) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected pid:tid, got {raw:?}"))?;
    let pid = pid.parse::<u64>().map_err(|e| format!("bad pid {pid:?}: {e}"))?;
    let tid = tid.parse::<u64>().map_err(|e| format!("bad tid {tid:?}: {e}"))?;
    Ok(PostRef::new(pid, tid))
}

fn ids(raw: Vec<u64>) -> Vec<PostId> {
    raw.into_iter().map(PostId).collect()
}

/// Runs one query and returns its result as JSON.
pub async fn run(service: &PostService, command: Command) -> anyhow::Result<Value> {
    let value = match command {
        Command::Exists { pids } => json!(service.exists_many(&ids(pids)).await?),
        Command::Pids {
            set,
            start,
            stop,
            reverse,
        } => {
            let cursor = PageCursor::from_query(&start, &stop);
            json!(
                service
                    .get_pids_from_set(
                        &set,
                        cursor.map(|c| c.start),
                        cursor.map(|c| c.stop),
                        Direction::from_reverse(reverse),
                    )
                    .await?
            )
        }
        Command::Posts { pids, viewer } => {
            json!(service.get_posts_by_pids(&ids(pids), UserId(viewer)).await?)
        }
        Command::Topic { tid, pids, viewer } => json!(
            service
                .get_posts_for_viewer(&ids(pids), UserId(viewer), TopicId(tid))
                .await?
        ),
        Command::Summaries {
            set,
            start,
            stop,
            viewer,
        } => {
            let cursor = PageCursor::from_query(&start, &stop)
                .ok_or_else(|| anyhow::anyhow!("start and stop must be integers"))?;
            json!(
                service
                    .get_post_summaries_from_set(&set, UserId(viewer), cursor)
                    .await?
            )
        }
        Command::Index { pid, tid, mode } => {
            json!(service.get_pid_index(PostId(pid), TopicId(tid), &mode).await?)
        }
        Command::Indices { posts, viewer } => {
            json!(service.get_post_indices(&posts, UserId(viewer)).await?)
        }
    };
    Ok(value)
}
