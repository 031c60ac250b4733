//! Terminal renditions of the results and debug views. Each command builds
//! its projections fresh from the cached analysis; failures surface both as
//! a transient notification on stderr and a blocking error block on stdout,
//! with a retry hint only where retrying the same request could help.

use std::sync::Arc;

use anyhow::Result;

use wordatro_client::ApiClient;
use wordatro_core::{
    category_letter_line, match_rows, region_rows, validate_key, word_groups, AnalysisResult,
    Category, ClientState, HelperError, RequestKey,
};

pub struct App {
    pub client: ApiClient,
    pub state: Arc<ClientState>,
}

/// Notification plus blocking error view; returns the error for the exit
/// status. No failure is fatal beyond the command that triggered it.
pub fn fail(err: HelperError) -> anyhow::Error {
    eprintln!("error: {err}");
    println!("--- Error ---");
    println!("{err}");
    if err.is_retryable() {
        println!("Run the same command again to retry, or re-upload the screenshot.");
    } else {
        println!("Change the selection (see `wordatro dictionaries` / `wordatro strategies`).");
    }
    anyhow::Error::new(err)
}

/// Catalog fetch + key validation shared by the results and debug views: a
/// cached result may only be rendered while its selections are still offered.
async fn checked_analysis(app: &App, key: &RequestKey) -> Result<Arc<AnalysisResult>> {
    let dictionaries = app
        .state
        .dictionary_catalog(&app.client)
        .await
        .map_err(fail)?;
    let strategies = app
        .state
        .strategy_catalog(&app.client)
        .await
        .map_err(fail)?;
    validate_key(key, &dictionaries, &strategies).map_err(fail)?;

    app.state
        .analysis(&app.client, key.clone())
        .await
        .map_err(fail)
}

pub async fn results(app: &App, key: &RequestKey, refresh: bool) -> Result<()> {
    if refresh {
        app.state.analyses.invalidate(key);
    }
    let result = checked_analysis(app, key).await?;

    println!(
        "Original image: {}",
        app.client.uploaded_file_url(&result.original_image)
    );
    println!(
        "Debug image:    {}",
        app.client.uploaded_file_url(&result.debug_info.debug_image)
    );
    println!();
    println!("Analyze Results");
    for category in Category::ALL {
        println!(
            "  {}: {}",
            category,
            category_letter_line(&result, category)
        );
    }
    println!("  Max Length: {}", result.debug_info.max_length);
    println!();
    println!("Available Words");
    let groups = word_groups(&result);
    if groups.is_empty() {
        println!("  (none)");
    }
    for group in groups {
        println!("  Length {}: {}", group.length, group.words.join(", "));
    }
    Ok(())
}

pub async fn inspect(app: &App, key: &RequestKey) -> Result<()> {
    let result = checked_analysis(app, key).await?;

    println!(
        "Region marked image: {}",
        app.client.uploaded_file_url(&result.debug_info.debug_image)
    );
    for category in Category::ALL {
        let rows = region_rows(&result, category);
        println!();
        println!("{} Regions ({} found)", category, rows.len());
        for row in rows {
            println!(
                "  #{} [{}] {} {} preview={}",
                row.display_id,
                row.region_id,
                row.location,
                row.size,
                app.client.uploaded_file_url(&row.preview)
            );
            let region = &result.debug_info.categories.get(category)[row.display_id - 1];
            for m in match_rows(region) {
                println!(
                    "      {:>2}. {:<3} {:>7}  {}",
                    m.rank, m.letter, m.similarity, m.template
                );
            }
        }
    }
    Ok(())
}

pub async fn catalog(app: &App, which: CatalogKind) -> Result<()> {
    let entries = match which {
        CatalogKind::Dictionaries => app
            .state
            .dictionary_catalog(&app.client)
            .await
            .map_err(fail)?,
        CatalogKind::Strategies => app
            .state
            .strategy_catalog(&app.client)
            .await
            .map_err(fail)?,
    };
    for entry in entries.iter() {
        println!("{entry}");
    }
    Ok(())
}

#[derive(Clone, Copy)]
pub enum CatalogKind {
    Dictionaries,
    Strategies,
}
