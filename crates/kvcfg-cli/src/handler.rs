//! Command handler for the inspector

use std::path::PathBuf;

use kvcfg::{hash, ConfigStore};
use serde::Serialize;
use tracing::debug;

use crate::reply::Reply;

const HELP: &[&str] = &[
    "GET key",
    "INT key [base]",
    "UINT key [base]",
    "FLOAT key",
    "INDEX key",
    "KEYOF value",
    "ENTRY n",
    "KEY n",
    "VALUE n",
    "COUNT",
    "LIST",
    "SET key value...",
    "CACHE n",
    "CLEARCACHE",
    "STATS",
    "RELOAD",
    "HASH text",
    "PING",
];

#[derive(Serialize)]
struct EntryView<'a> {
    ordinal: usize,
    key: &'a str,
    value: Option<&'a str>,
    key_hash: u32,
    value_hash: u32,
}

/// Dispatches command words against one store
pub struct CommandHandler {
    store: ConfigStore,
    source: Option<PathBuf>,
    json: bool,
}

fn arity(name: &str) -> Reply {
    Reply::error(format!("wrong number of arguments for '{}' command", name))
}

fn parse_num<T: std::str::FromStr>(text: &str, what: &str) -> Result<T, Reply> {
    text.parse()
        .map_err(|_| Reply::error(format!("{} is not a valid {}", text, what)))
}

impl CommandHandler {
    /// Handler over a loaded store; `source` is re-read by RELOAD
    pub fn new(store: ConfigStore, source: Option<PathBuf>) -> Self {
        Self {
            store,
            source,
            json: false,
        }
    }

    /// Render LIST as JSON
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Run one command
    pub fn handle(&mut self, words: &[&str]) -> Reply {
        let Some((verb, args)) = words.split_first() else {
            return Reply::error("empty command");
        };

        let verb = verb.to_ascii_uppercase();
        debug!(command = %verb, args = args.len(), "handling command");

        let result = match verb.as_str() {
            "PING" => Ok(Reply::Status("PONG".to_string())),
            "HELP" => Ok(Reply::List(
                HELP.iter().map(|h| Reply::Status(h.to_string())).collect(),
            )),
            "GET" => self.handle_get(args),
            "INT" => self.handle_int(args),
            "UINT" => self.handle_uint(args),
            "FLOAT" => self.handle_float(args),
            "INDEX" => self.handle_index(args),
            "KEYOF" => self.handle_keyof(args),
            "ENTRY" => self.handle_entry(args),
            "KEY" => self.handle_key(args),
            "VALUE" => self.handle_value(args),
            "COUNT" => Ok(Reply::Integer(self.store.len() as i64)),
            "LIST" => self.handle_list(),
            "SET" => self.handle_set(args),
            "CACHE" => self.handle_cache(args),
            "CLEARCACHE" => self.store.clear_cache().map(|_| Reply::ok()).map_err(Reply::error),
            "STATS" => Ok(self.handle_stats()),
            "RELOAD" => self.handle_reload(),
            "HASH" => self.handle_hash(args),
            _ => Err(Reply::error(format!("unknown command '{}'", verb))),
        };

        result.unwrap_or_else(|reply| reply)
    }

    fn handle_get(&mut self, args: &[&str]) -> Result<Reply, Reply> {
        let [key] = args else {
            return Err(arity("get"));
        };
        self.store.get(key).map(Reply::text).map_err(Reply::error)
    }

    fn base_arg(args: &[&str], name: &str) -> Result<(String, u32), Reply> {
        match args {
            [key] => Ok((key.to_string(), 10)),
            [key, base] => Ok((key.to_string(), parse_num(base, "base")?)),
            _ => Err(arity(name)),
        }
    }

    fn handle_int(&mut self, args: &[&str]) -> Result<Reply, Reply> {
        let (key, base) = Self::base_arg(args, "int")?;
        self.store
            .get_i64(&key, base)
            .map(Reply::Integer)
            .map_err(Reply::error)
    }

    fn handle_uint(&mut self, args: &[&str]) -> Result<Reply, Reply> {
        let (key, base) = Self::base_arg(args, "uint")?;
        self.store
            .get_u64(&key, base)
            .map(Reply::Unsigned)
            .map_err(Reply::error)
    }

    fn handle_float(&mut self, args: &[&str]) -> Result<Reply, Reply> {
        let [key] = args else {
            return Err(arity("float"));
        };
        self.store.get_f64(key).map(Reply::Float).map_err(Reply::error)
    }

    fn handle_index(&self, args: &[&str]) -> Result<Reply, Reply> {
        let [key] = args else {
            return Err(arity("index"));
        };
        let index = self.store.index_of(key).map_err(Reply::error)?;
        Ok(index.map_or(Reply::Text(None), |i| Reply::Integer(i as i64)))
    }

    fn handle_keyof(&self, args: &[&str]) -> Result<Reply, Reply> {
        if args.is_empty() {
            return Err(arity("keyof"));
        }
        let value = args.join(" ");
        self.store.key_of(&value).map(Reply::text).map_err(Reply::error)
    }

    fn ordinal_arg(args: &[&str], name: &str) -> Result<usize, Reply> {
        let [n] = args else {
            return Err(arity(name));
        };
        parse_num(n, "ordinal")
    }

    fn handle_entry(&self, args: &[&str]) -> Result<Reply, Reply> {
        let n = Self::ordinal_arg(args, "entry")?;
        let entry = self.store.entry(n).map_err(Reply::error)?;
        Ok(entry.map_or(Reply::Text(None), |e| {
            Reply::List(vec![Reply::text(Some(e.key())), Reply::text(e.value())])
        }))
    }

    fn handle_key(&self, args: &[&str]) -> Result<Reply, Reply> {
        let n = Self::ordinal_arg(args, "key")?;
        self.store.key(n).map(Reply::text).map_err(Reply::error)
    }

    fn handle_value(&self, args: &[&str]) -> Result<Reply, Reply> {
        let n = Self::ordinal_arg(args, "value")?;
        self.store.value(n).map(Reply::text).map_err(Reply::error)
    }

    fn handle_list(&self) -> Result<Reply, Reply> {
        let entries = self.store.entries().map_err(Reply::error)?;

        if self.json {
            let views: Vec<_> = entries
                .iter()
                .enumerate()
                .map(|(ordinal, e)| EntryView {
                    ordinal,
                    key: e.key(),
                    value: e.value(),
                    key_hash: e.key_hash(),
                    value_hash: e.value_hash(),
                })
                .collect();
            return serde_json::to_value(views)
                .map(Reply::Json)
                .map_err(Reply::error);
        }

        Ok(Reply::List(
            entries
                .iter()
                .map(|e| match e.value() {
                    Some(v) => Reply::Status(format!("{} = {:?}", e.key(), v)),
                    None => Reply::Status(format!("{} =", e.key())),
                })
                .collect(),
        ))
    }

    fn handle_set(&mut self, args: &[&str]) -> Result<Reply, Reply> {
        let [key, value @ ..] = args else {
            return Err(arity("set"));
        };
        if value.is_empty() {
            return Err(arity("set"));
        }
        self.store
            .set(key, &value.join(" "))
            .map(|_| Reply::ok())
            .map_err(Reply::error)
    }

    fn handle_cache(&mut self, args: &[&str]) -> Result<Reply, Reply> {
        let [n] = args else {
            return Err(arity("cache"));
        };
        let capacity: i64 = parse_num(n, "capacity")?;
        self.store
            .set_cache_capacity(capacity)
            .map(|_| Reply::ok())
            .map_err(Reply::error)
    }

    fn handle_stats(&self) -> Reply {
        let stats = self.store.cache_stats();
        let lines = [
            format!("entries:{}", self.store.len()),
            format!("cache_capacity:{}", self.store.cache_capacity()),
            format!("cache_hits:{}", stats.hits()),
            format!("cache_misses:{}", stats.misses()),
            format!("cache_inserts:{}", stats.inserts()),
            format!("cache_evictions:{}", stats.evictions()),
            format!("cache_hit_ratio:{:.2}", stats.hit_ratio()),
        ];
        Reply::List(lines.into_iter().map(Reply::Status).collect())
    }

    fn handle_reload(&mut self) -> Result<Reply, Reply> {
        let Some(source) = &self.source else {
            return Err(Reply::error("no source file to reload"));
        };
        self.store.parse_file(source).map_err(Reply::error)?;
        Ok(Reply::Integer(self.store.len() as i64))
    }

    fn handle_hash(&self, args: &[&str]) -> Result<Reply, Reply> {
        if args.is_empty() {
            return Err(arity("hash"));
        }
        let text = args.join(" ");
        Ok(Reply::Status(format!("{:#010x}", hash(Some(text.as_str())))))
    }
}
