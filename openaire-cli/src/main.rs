//! `openaire` command-line client.

mod args;
mod output;

use std::io;
use std::io::BufWriter;
use std::io::Write;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use log::info;
use log::warn;
use log::LevelFilter;
use openaire_lib::api::query::EntityKind;
use openaire_lib::api::query::QueryBuilder;
use openaire_lib::OpenAireClient;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::TermLogger;
use simplelog::TerminalMode;

use args::Cli;
use args::Entity;
use args::SortArg;
use output::RecordWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)
        .context("failed to initialize logger")?;

    let mut builder = OpenAireClient::builder();
    if let Some(api_key) = &cli.api_key {
        builder = builder.api_key(api_key);
    }
    if let Some(base_url) = &cli.base_url {
        builder = builder.base_url(base_url);
    }
    let client = builder.build()?;

    for flag in cli.ignored_flags() {
        warn!("{flag} does not apply to {}; ignoring it.", cli.entity);
    }

    match cli.entity {
        Entity::ResearchProducts => {
            let mut query = client.research_products();
            if let Some(title) = &cli.title {
                query = query.main_title(title)?;
            }
            if let Some(author) = &cli.author {
                query = query.author(author)?;
            }
            if let Some(pid) = &cli.pid {
                query = query.pid(pid)?;
            }
            if let Some(country) = &cli.country {
                query = query.country_code(country)?;
            }
            print_results(query, &cli).await
        }
        Entity::Organizations => {
            let mut query = client.organizations();
            if let Some(title) = &cli.title {
                query = query.legal_name(title)?;
            }
            if let Some(pid) = &cli.pid {
                query = query.pid(pid)?;
            }
            if let Some(country) = &cli.country {
                query = query.country_code(country)?;
            }
            print_results(query, &cli).await
        }
        Entity::DataSources => {
            let mut query = client.data_sources();
            if let Some(title) = &cli.title {
                query = query.official_name(title)?;
            }
            if let Some(pid) = &cli.pid {
                query = query.pid(pid)?;
            }
            print_results(query, &cli).await
        }
        Entity::Projects => {
            let mut query = client.projects();
            if let Some(title) = &cli.title {
                query = query.title(title)?;
            }
            if let Some(pid) = &cli.pid {
                query = query.code(pid)?;
            }
            if let Some(funder) = &cli.funder {
                query = query.funding_short_name(funder)?;
            }
            print_results(query, &cli).await
        }
    }
}

/// Applies the entity-independent options and streams records to stdout.
async fn print_results<E: EntityKind>(mut query: QueryBuilder<E>, cli: &Cli) -> Result<()> {
    if let Some(search) = &cli.search {
        query = query.search(search)?;
    }
    if let Some(raw) = &cli.sort {
        if let Some(sort) = SortArg::parse(raw) {
            if !sort.explicit {
                warn!("Sort direction not specified for '{raw}', defaulting to DESC.");
            }
            query = query.sort(&sort.field, sort.ascending)?;
        }
    }
    query = query.page_size(cli.page_size)?;

    let stdout = io::stdout();
    let mut writer = RecordWriter::new(BufWriter::new(stdout.lock()), cli.format);

    let streamed = stream_records(&query, cli.max_results, &mut writer).await;
    let fetched = writer.written();
    writer.finish()?;
    streamed?;

    info!("Fetched {fetched} {} records.", cli.entity);
    Ok(())
}

/// Writes records page by page until the query is exhausted or
/// `max_results` records have been written.
///
/// The writer is left open on failure so the caller can still finish it.
async fn stream_records<E: EntityKind, W: Write>(
    query: &QueryBuilder<E>,
    max_results: usize,
    writer: &mut RecordWriter<W>,
) -> Result<()> {
    if max_results == 0 {
        return Ok(());
    }

    let mut pages = query.iterate_pages();
    while let Some(page) = pages.next().await {
        for record in page?.items() {
            writer.write(record)?;
            if writer.written() >= max_results {
                info!("Reached max results limit ({max_results}).");
                pages.close();
                return Ok(());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use openaire_lib::api::query::PageResult;
    use openaire_lib::api::query::QuerySpec;
    use openaire_lib::api::query::Record;
    use openaire_lib::error::TransportError;
    use openaire_lib::transport::Transport;
    use openaire_lib::RetryConfig;
    use serde_json::json;

    use super::*;
    use crate::args::OutputFormat;

    /// Serves one page with a cursor, then rejects the cursor.
    struct FailsOnSecondPage {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl Transport for FailsOnSecondPage {
        async fn send(&self, _spec: &QuerySpec) -> Result<PageResult, TransportError> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if *calls == 1 {
                let items = vec![json!({"id": 1}), json!({"id": 2})];
                Ok(PageResult::new(items).with_next_cursor("c1"))
            } else {
                Err(TransportError::from_status(400, "bad cursor"))
            }
        }
    }

    fn client() -> OpenAireClient {
        OpenAireClient::builder()
            .transport(Arc::new(FailsOnSecondPage { calls: Mutex::new(0) }))
            .retry(RetryConfig::no_retry())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_failed_fetch_still_yields_json_array() {
        let query = client().research_products();
        let mut writer = RecordWriter::new(Vec::new(), OutputFormat::Json);

        let streamed = stream_records(&query, 100, &mut writer).await;
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();

        assert!(streamed.unwrap_err().to_string().contains("researchProducts"));
        let parsed: Vec<Record> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, vec![json!({"id": 1}), json!({"id": 2})]);
    }

    #[tokio::test]
    async fn test_max_results_stops_before_next_page() {
        let query = client().research_products();
        let mut writer = RecordWriter::new(Vec::new(), OutputFormat::Jsonl);

        stream_records(&query, 1, &mut writer).await.unwrap();
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(out, "{\"id\":1}\n");
    }
}
