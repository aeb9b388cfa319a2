//! Static export: write the eagerly generated page set to disk.
//!
//! `dimora export <DIR>` renders the landing page and every featured listing
//! detail page through the same code paths the server uses, then writes them
//! alongside sitemap.xml and robots.txt as plain files.

use std::path::{Path, PathBuf};

use axum::{http::StatusCode, response::Response};
use futures::stream::{self, TryStreamExt};
use tokio::fs;
use tracing::{info, warn};

use crate::application::error::AppError;
use crate::infra::error::InfraError;
use crate::infra::http::{HttpState, public};

const EXPORT_CONCURRENCY: usize = 4;
const MAX_EXPORT_BODY_BYTES: usize = 1024 * 1024;

pub async fn export_site(state: &HttpState, out_dir: &Path) -> Result<(), AppError> {
    fs::create_dir_all(out_dir.join("listings"))
        .await
        .map_err(|err| AppError::from(InfraError::Io(err)))?;

    let response = public::index_response(state).await;
    if response.status() != StatusCode::OK {
        return Err(AppError::unexpected(format!(
            "landing page rendered with status {}",
            response.status()
        )));
    }
    write_response(out_dir.join("index.html"), response).await?;

    let featured = state.catalog.featured_ids().to_vec();
    stream::iter(featured.into_iter().map(Ok::<String, AppError>))
        .try_for_each_concurrent(Some(EXPORT_CONCURRENCY), |id| {
            let state = state.clone();
            let out_dir = out_dir.to_path_buf();
            async move {
                let response = public::listing_response(&state, &id).await;
                if response.status() != StatusCode::OK {
                    warn!(
                        target = "dimora::export",
                        id = %id,
                        status = response.status().as_u16(),
                        "skipping featured listing that did not render OK"
                    );
                    return Ok(());
                }
                write_response(out_dir.join("listings").join(format!("{id}.html")), response).await
            }
        })
        .await?;

    let sitemap = state
        .sitemap
        .sitemap_xml()
        .await
        .map_err(|err| AppError::unexpected(format!("sitemap generation failed: {err}")))?;
    fs::write(out_dir.join("sitemap.xml"), sitemap)
        .await
        .map_err(|err| AppError::from(InfraError::Io(err)))?;
    fs::write(out_dir.join("robots.txt"), state.sitemap.robots_txt())
        .await
        .map_err(|err| AppError::from(InfraError::Io(err)))?;

    info!(
        target = "dimora::export",
        path = %out_dir.display(),
        "Export completed"
    );
    Ok(())
}

async fn write_response(path: PathBuf, response: Response) -> Result<(), AppError> {
    let body = axum::body::to_bytes(response.into_body(), MAX_EXPORT_BODY_BYTES)
        .await
        .map_err(|err| AppError::unexpected(format!("failed to buffer rendered page: {err}")))?;
    fs::write(&path, &body)
        .await
        .map_err(|err| AppError::from(InfraError::Io(err)))?;

    info!(
        target = "dimora::export",
        path = %path.display(),
        "wrote exported page"
    );
    Ok(())
}
