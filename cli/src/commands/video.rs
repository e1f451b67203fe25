use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;
use vidsearch_config::Config;
use vidsearch_pipeline::{ProcessOutcome, SearchResultChunk, Services, Video};

use super::ui;
use super::VideoCommand;

pub async fn handle_video(command: VideoCommand, config: &Config) -> Result<()> {
    let services = Services::from_config(config).await?;

    match command {
        VideoCommand::Populate {
            drop_db_first,
            videos_file,
        } => {
            let path = videos_file.unwrap_or_else(|| config.core.videos_file.clone());
            ui::print_header(&format!("Populating from {}", path.display()));
            let inserted = services
                .processing
                .populate_default_videos(&path, drop_db_first)
                .await?;
            ui::print_success(&format!("{} new videos stored", inserted));
        }
        VideoCommand::Search { query, top } => {
            let results = services.search.search(&query, top).await?;
            ui::print_header(&format!("Results for: {}", query));
            print_search_results(&results);
        }
        VideoCommand::Create { id, title, meta } => {
            let meta: serde_json::Value =
                serde_json::from_str(&meta).context("--meta must be a JSON object")?;
            let video = Video::new(id, title, meta);
            match services.processing.process_video(&video).await? {
                ProcessOutcome::Skipped => {
                    ui::print_key_value("Skipped", &format!("{} is already stored", video.url()))
                }
                ProcessOutcome::Inserted {
                    document_id,
                    chunks,
                } => ui::print_success(&format!(
                    "stored {} as #{} with {} chunks",
                    video.url(),
                    document_id,
                    chunks
                )),
            }
        }
        VideoCommand::List { limit, offset } => {
            let videos = match limit {
                Some(limit) => {
                    let (videos, total) = services.crud.list_videos_paginated(limit, offset).await?;
                    ui::print_key_value("Total", &total.to_string());
                    videos
                }
                None => services.crud.list_videos().await?,
            };
            print_videos(&videos);
        }
        VideoCommand::Get { video_id } => {
            let video = services.crud.get_video(video_id).await?;
            print_videos(&[video]);
        }
        VideoCommand::ExportAll { file_path } => {
            export(&services, &file_path).await?;
        }
    }

    Ok(())
}

async fn export(services: &Services, file_path: &Path) -> Result<()> {
    let count = services
        .processing
        .export_videos_as_json_file(file_path)
        .await?;
    info!(path = %file_path.display(), count, "exported videos");
    ui::print_success(&format!("exported {} videos to {}", count, file_path.display()));
    Ok(())
}

fn print_videos(videos: &[Video]) {
    let rows: Vec<Vec<String>> = videos
        .iter()
        .map(|v| {
            vec![
                v.internal_id.map(|id| id.to_string()).unwrap_or_default(),
                v.title.clone(),
                v.url(),
                v.meta.to_string(),
            ]
        })
        .collect();
    ui::print_table(&["ID", "Title", "URL", "Meta"], &rows);
}

fn print_search_results(results: &[SearchResultChunk]) {
    let rows: Vec<Vec<String>> = results
        .iter()
        .map(|r| {
            vec![
                r.document_title.clone(),
                r.document_url.clone(),
                ui::truncate_snippet(&r.text),
                format!("{:.2}", r.distance),
                ui::format_timestamp(r.start_ts),
                ui::format_timestamp(r.end_ts),
            ]
        })
        .collect();
    ui::print_table(
        &["Document Title", "Document URL", "Snippet", "Distance", "Start Time", "End Time"],
        &rows,
    );
}
