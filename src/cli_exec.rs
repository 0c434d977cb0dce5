use anyhow::{Context, Result};

use nodedash::backend::{Backend, HttpBackend, normalize};
use nodedash::catalog::ResourceCatalog;
use nodedash::config::DashboardConfig;
use nodedash::jobs::JobSubmitter;
use nodedash::model::{Catalog, JobRequest, JobResult, TrainForm};
use nodedash::present::present;
use nodedash::selection::SelectionController;

use crate::Commands;

pub(crate) async fn handle_command(config: &DashboardConfig, command: Commands) -> Result<()> {
    let backend = HttpBackend::new(config)?;

    match command {
        Commands::Nodes { json } => {
            let catalog = load_catalog(&backend, true).await?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&catalog.nodes).context("serialize nodes json")?
                );
            } else if catalog.nodes.is_empty() {
                println!("(no nodes)");
            } else {
                for node in &catalog.nodes {
                    let models = node.model_set().iter().collect::<Vec<_>>().join(", ");
                    println!("{}: {}", node.name, models);
                }
            }
        }
        Commands::Images { json } => {
            let catalog = load_catalog(&backend, true).await?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&catalog.images)
                        .context("serialize images json")?
                );
            } else {
                for image in &catalog.images {
                    println!("{}", image);
                }
            }
        }
        Commands::Train {
            model_name,
            node,
            model_type,
            epochs,
            batch_size,
            learning_rate,
            json,
        } => {
            let catalog = load_catalog(&backend, false).await?;
            let selection = SelectionController::new();
            selection.catalog_loaded(&catalog);
            if let Some(node) = node {
                selection.set_node(&catalog, &node);
            }
            let form = TrainForm {
                model_name,
                model_type,
                epochs,
                batch_size,
                learning_rate,
            };
            let request = JobRequest::Train(form.request_for(&selection.state()));
            let result = JobSubmitter::new(backend).submit(request).await;
            print_result(&result, json)?;
        }
        Commands::Infer {
            image,
            node,
            model,
            json,
        } => {
            let catalog = load_catalog(&backend, false).await?;
            let selection = SelectionController::new();
            selection.catalog_loaded(&catalog);
            if let Some(node) = node {
                selection.set_node(&catalog, &node);
            }
            if let Some(model) = model {
                if !selection.set_model(&catalog, &model) {
                    let node = selection.state().selected_node.unwrap_or_default();
                    anyhow::bail!("model '{}' is not available on node '{}'", model, node);
                }
            }
            selection.set_image(&catalog, &image);
            let request = JobRequest::Inference(selection.state().inference_request());
            let result = JobSubmitter::new(backend).submit(request).await;
            print_result(&result, json)?;
        }
        Commands::Preview { image, out } => {
            let bytes = backend
                .fetch_image(&image)
                .await
                .map_err(normalize)
                .with_context(|| format!("fetch image {}", image))?;
            std::fs::write(&out, &bytes).with_context(|| format!("write {}", out.display()))?;
            println!("wrote {} bytes to {}", bytes.len(), out.display());
        }
        Commands::Report { node, name, json } => {
            let report = backend
                .fetch_report(&node, &name)
                .await
                .map_err(normalize)
                .with_context(|| format!("fetch report {} on {}", name, node))?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("serialize report json")?
                );
            } else {
                print_report(&report);
            }
        }
    }

    Ok(())
}

/// Loads the catalog; listing commands fail on an unreachable broker, job
/// commands carry on with the empty catalog.
async fn load_catalog(backend: &HttpBackend, strict: bool) -> Result<Catalog> {
    let mut catalog = ResourceCatalog::new();
    let snapshot = catalog.load(backend).await.clone();
    if let Some(err) = &snapshot.load_error {
        if strict {
            anyhow::bail!("load catalog from {}: {}", backend.base_url(), err);
        }
        eprintln!("warning: catalog unavailable ({})", err);
    }
    Ok(snapshot)
}

fn print_result(result: &JobResult, json: bool) -> Result<()> {
    let view = present(result);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(result).context("serialize job result json")?
        );
    } else if !view.is_failure() {
        for line in view.lines() {
            println!("{}", line);
        }
    }
    if let Some(err) = result.error() {
        anyhow::bail!("{} job failed ({}): {}", result.kind, err.kind, err.message);
    }
    Ok(())
}

fn print_report(report: &serde_json::Value) {
    match report.as_object() {
        Some(map) => {
            for (k, v) in map {
                match v {
                    serde_json::Value::String(s) => println!("{}: {}", k, s),
                    other => println!("{}: {}", k, other),
                }
            }
        }
        None => println!("{}", report),
    }
}
