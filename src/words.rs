use rand::seq::SliceRandom;
use rand::Rng;
use std::error::Error;
use std::time::Duration;

/// Words longer than this never make it into a pool.
pub const MAX_WORD_LEN: usize = 8;
/// Upper bound on the number of words sampled per session.
pub const POOL_SIZE: usize = 200;

const API_URL: &str = "https://random-word-api.herokuapp.com/all";
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Built-in list used whenever the word api cannot be reached or parsed.
pub fn fallback_words() -> Vec<String> {
    ["default", "word", "list", "in", "case", "of", "error"]
        .iter()
        .map(|w| w.to_string())
        .collect()
}

/// The fixed word set a session is run over. Produced by one sampling
/// operation at session start and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordPool {
    words: Vec<String>,
}

impl WordPool {
    pub fn from_words(words: Vec<String>) -> Self {
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.words.get(idx).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

/// Seam over the remote word list so tests can inject canned responses.
pub trait WordApi {
    fn all_words(&self, lang: Option<&str>) -> Result<Vec<String>, Box<dyn Error>>;
}

/// Production client for the random-word-api "all" endpoint. One blocking
/// request with a short timeout; no retries.
pub struct RandomWordApi;

impl WordApi for RandomWordApi {
    fn all_words(&self, lang: Option<&str>) -> Result<Vec<String>, Box<dyn Error>> {
        let words = ureq::get(&api_url(lang))
            .timeout(FETCH_TIMEOUT)
            .call()?
            .into_json::<Vec<String>>()?;
        Ok(words)
    }
}

fn api_url(lang: Option<&str>) -> String {
    match lang {
        Some(tag) => format!("{API_URL}?lang={tag}"),
        None => API_URL.to_string(),
    }
}

/// How the pool was obtained. `Fallback` carries the diagnostic for the
/// failed fetch so callers can surface it without a logging side channel.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Fetched(WordPool),
    Fallback(WordPool, String),
}

impl FetchOutcome {
    pub fn pool(&self) -> &WordPool {
        match self {
            FetchOutcome::Fetched(pool) | FetchOutcome::Fallback(pool, _) => pool,
        }
    }

    pub fn into_pool(self) -> WordPool {
        match self {
            FetchOutcome::Fetched(pool) | FetchOutcome::Fallback(pool, _) => pool,
        }
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            FetchOutcome::Fetched(_) => None,
            FetchOutcome::Fallback(_, reason) => Some(reason),
        }
    }
}

/// Fetch the full list for `lang` and sample a session pool from it.
/// Fetch failure is never an error: the built-in list stands in and the
/// reason rides on the outcome.
pub fn fetch_pool(api: &dyn WordApi, lang: Option<&str>) -> FetchOutcome {
    let mut rng = rand::thread_rng();
    match api.all_words(lang) {
        Ok(words) => FetchOutcome::Fetched(sample_pool(&words, &mut rng)),
        Err(err) => {
            FetchOutcome::Fallback(sample_pool(&fallback_words(), &mut rng), err.to_string())
        }
    }
}

/// Pool built from the built-in list without touching the network.
pub fn offline_pool() -> WordPool {
    sample_pool(&fallback_words(), &mut rand::thread_rng())
}

/// Keep only short words, then draw a uniform sample without replacement
/// of up to `POOL_SIZE` of them. An empty result is legal when everything
/// was filtered out.
pub fn sample_pool<R: Rng + ?Sized>(source: &[String], rng: &mut R) -> WordPool {
    let short: Vec<&String> = source
        .iter()
        .filter(|w| w.chars().count() <= MAX_WORD_LEN)
        .collect();
    let take = short.len().min(POOL_SIZE);
    let words = short
        .choose_multiple(rng, take)
        .map(|w| (*w).clone())
        .collect();
    WordPool::from_words(words)
}
