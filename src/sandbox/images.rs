//! Image pulling for the experiment catalog
//!
//! Pulls the editor image plus every distinct task image from a repository
//! prefix and re-tags them to the bare names the task definitions use.

use tracing::{debug, error};

use super::ContainerRuntime;
use crate::error::Result;
use crate::registry::TaskRegistry;

/// Image for the long-lived editor sandbox container
pub const EDITOR_IMAGE: &str = "experiment-editor:xenial";

/// Default repository prefix for `pull_images`
pub const DEFAULT_IMAGE_PREFIX: &str = "bernhard97";

/// Every image the catalog references: the editor image first, then the
/// distinct work-task images in registration order.
pub fn distinct_images(registry: &TaskRegistry) -> Vec<String> {
    let mut images = vec![EDITOR_IMAGE.to_string()];
    for task in registry.all() {
        if let Some(image) = task.image() {
            if !images.iter().any(|i| i == image) {
                images.push(image.to_string());
            }
        }
    }
    images
}

/// Pull all catalog images from `<prefix>/<image>` and re-tag them to the
/// bare image names. Per-image failures are reported and do not abort the
/// remaining pulls; returns whether every image was pulled.
pub fn pull_images(
    runtime: &dyn ContainerRuntime,
    registry: &TaskRegistry,
    prefix: &str,
) -> Result<bool> {
    let images = distinct_images(registry);
    debug!(prefix, ?images, "pulling catalog images");

    let mut success = true;
    for image in &images {
        let repo_image = format!("{}/{}", prefix, image);
        println!("pulling image {} ...", repo_image);

        match runtime.pull(&repo_image) {
            Ok(()) => {
                debug!(image = %repo_image, "successfully pulled image");
                // tag the image so the task definitions do not have to
                // carry the repo prefix
                if let Err(e) = runtime.tag(&repo_image, image) {
                    error!(image = %repo_image, error = %e, "failed tagging image");
                    println!("error tagging image {}: {}", repo_image, e);
                    success = false;
                }
            }
            Err(e) => {
                error!(image = %repo_image, error = %e, "failed pulling image");
                println!("error pulling image {}: {}", repo_image, e);
                success = false;
            }
        }
        println!();
    }

    if !success {
        println!("one or more images couldn't be pulled, please try again");
    }
    Ok(success)
}
