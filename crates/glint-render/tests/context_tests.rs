//! Graphics context lifecycle tests.

use glint_render::{GraphicsContext, GraphicsContextDescriptor, GraphicsError, RenderContext};
use std::sync::Arc;

#[test]
#[ignore] // Requires GPU - run with: cargo test --test context_tests -- --ignored
fn test_context_creation_sync() {
    match GraphicsContext::new_owned_sync() {
        Ok(ctx) => {
            assert_eq!(Arc::strong_count(&ctx), 1);
            assert!(ctx.limits().max_texture_dimension_2d > 0);
            assert!(!ctx.is_lost());
        }
        Err(e) => {
            println!("GPU not available: {}", e);
        }
    }
}

#[test]
#[ignore] // Requires GPU
fn test_context_as_render_context() {
    let descriptor = GraphicsContextDescriptor::new().force_fallback_adapter(true);
    if let Ok(ctx) = pollster::block_on(GraphicsContext::new_owned_with_descriptor(descriptor)) {
        let shared: Arc<dyn RenderContext> = ctx.clone();
        assert!(shared.is_current());
        assert_eq!(Arc::strong_count(&ctx), 2);
    }
}

#[test]
#[ignore] // Requires GPU
fn test_context_cleanup() {
    if let Ok(ctx) = GraphicsContext::new_owned_sync() {
        let weak = Arc::downgrade(&ctx);
        assert!(weak.upgrade().is_some());

        drop(ctx);
        assert!(weak.upgrade().is_none());
    }
}

#[test]
fn test_graphics_error_display() {
    let err = GraphicsError::NoAdapter;
    assert!(format!("{:?}", err).contains("NoAdapter"));

    let err = GraphicsError::DeviceCreationFailed("limits".into());
    assert!(err.to_string().contains("limits"));
}
