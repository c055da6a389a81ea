use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{debug, error, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, InlineQueryResult, InlineQueryResultArticle,
    InputMessageContent, InputMessageContentText, Message, MessageId, ParseMode,
};
use teloxide::{ApiError, RequestError};
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

mod controller;
mod markup;
mod models;
mod paginate;
mod rate_limit;
mod store;
mod telegram;
mod token;
mod views;

use controller::{Command, InlineResult, NavigationController, Reply};
use markup::Markup;
use models::{default_collections, Book, Collection, Hadith, Paged, RandomPick};
use paginate::{clamp_page, paginate};
use rate_limit::{start_cleanup_loop, RateLimiter};
use store::{Catalog, CollectionStore};
use token::{decode, encode, NavigationIntent, TextSource};
use views::{truncate_label, NumberedFrom, RenderedPage, Renderer};

const DEFAULT_GRADE: &str = "Sahih";
const MAX_SEARCH_LIMIT: usize = 50;
const DEFAULT_SEARCH_LIMIT: usize = 20;
const COLLECTIONS_PER_PAGE: usize = 6;
const BOOKS_PER_PAGE: usize = 10;
const HADITHS_PER_PAGE: usize = 10;
const COMMAND_SEARCH_PAGE_SIZE: usize = 10;
const NAV_SEARCH_PAGE_SIZE: usize = 5;
const INLINE_SEARCH_LIMIT: usize = 5;
const BOOK_LABEL_CHARS: usize = 40;
const HEADER_LABEL_CHARS: usize = 30;
const INLINE_DESCRIPTION_CHARS: usize = 100;
const TOKEN_ENV_VAR: &str = "TELEGRAM_BOT_TOKEN";

#[derive(Debug, Deserialize, Clone)]
struct Config {
    #[serde(default)]
    token: String,
    #[serde(default)]
    data_dir: Option<PathBuf>,
    #[serde(default = "default_rate_limit_requests")]
    rate_limit_requests: usize,
    #[serde(default = "default_rate_limit_window_seconds")]
    rate_limit_window_seconds: u64,
    #[serde(default = "default_cleanup_interval_seconds")]
    cleanup_interval_seconds: u64,
    #[serde(default)]
    markup: Markup,
    #[serde(default = "default_text_page_max_runes")]
    text_page_max_runes: usize,
    #[serde(default)]
    tidy_chat: bool,
    #[serde(default = "default_inline_cache_seconds")]
    inline_cache_seconds: u32,
    #[serde(default)]
    collections: Vec<Collection>,
    #[serde(default)]
    random_collections: Vec<String>,
    #[serde(default = "default_fallback_collection")]
    fallback_collection: String,
}

fn default_rate_limit_requests() -> usize {
    10
}

fn default_rate_limit_window_seconds() -> u64 {
    60
}

fn default_cleanup_interval_seconds() -> u64 {
    300
}

fn default_text_page_max_runes() -> usize {
    3800
}

fn default_inline_cache_seconds() -> u32 {
    10
}

fn default_fallback_collection() -> String {
    "bukhari".to_string()
}

impl Config {
    fn catalog(&self) -> Catalog {
        let collections = if self.collections.is_empty() {
            default_collections()
        } else {
            self.collections.clone()
        };
        let random_collections = if self.random_collections.is_empty() {
            collections.iter().map(|c| c.name.clone()).collect()
        } else {
            self.random_collections.clone()
        };
        Catalog {
            collections,
            random_collections,
            fallback_collection: self.fallback_collection.clone(),
        }
    }
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    config: PathBuf,
}

struct AppState {
    controller: NavigationController,
    limiter: Arc<RateLimiter>,
    tidy_chat: bool,
    inline_cache_seconds: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = load_config(&args.config)?;

    let catalog = config.catalog();
    let store = match &config.data_dir {
        Some(dir) => CollectionStore::load(dir, catalog),
        None => {
            info!("no data_dir configured, serving the collection table only");
            CollectionStore::new(catalog)
        }
    };
    info!("serving {} collections", store.collections().len());

    let limiter = Arc::new(RateLimiter::new(
        config.rate_limit_requests,
        Duration::from_secs(config.rate_limit_window_seconds),
    ));
    start_cleanup_loop(limiter.clone(), config.cleanup_interval_seconds);

    let state = Arc::new(AppState {
        controller: NavigationController::new(
            Arc::new(store),
            config.markup,
            config.text_page_max_runes,
        ),
        limiter,
        tidy_chat: config.tidy_chat,
        inline_cache_seconds: config.inline_cache_seconds,
    });

    let bot = Bot::new(config.token.clone());

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(telegram::handle_message))
        .branch(Update::filter_callback_query().endpoint(telegram::handle_callback))
        .branch(Update::filter_inline_query().endpoint(telegram::handle_inline_query));

    info!("starting dispatcher");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

fn load_config(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let mut config = parse_config(&contents)?;
    if config.token.trim().is_empty() {
        config.token = std::env::var(TOKEN_ENV_VAR).unwrap_or_default();
    }
    if config.token.trim().is_empty() {
        return Err(anyhow!("no bot token: set `token` or {}", TOKEN_ENV_VAR));
    }
    Ok(config)
}

fn parse_config(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents).context("parse config")?;
    Ok(config)
}

fn parse_command(text: &str) -> Option<&str> {
    let first = text.split_whitespace().next()?;
    if !first.starts_with('/') {
        return None;
    }
    let cmd = first.trim_start_matches('/');
    Some(cmd.split('@').next().unwrap_or(cmd))
}
