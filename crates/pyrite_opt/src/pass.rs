//! Pass scheduling driven by [`OptimizationConfig`].

use pyrite_ast::Module;
use pyrite_config::OptimizationConfig;
use tracing::debug;

use crate::deep::DeepFolder;
use crate::fold::ConstantFolder;
use crate::transform::Transformer;

/// Applies the enabled tree passes and returns the rewritten module.
///
/// The single-level folder runs first; the deep folder, when enabled, runs
/// on its output.
pub fn optimize(module: Module, config: &OptimizationConfig) -> Module {
    let mut module = module;

    if config.constant_folding {
        let mut folder = ConstantFolder::new();
        module = folder.visit_module(module);
        debug!(
            folded = folder.folded(),
            abandoned = folder.abandoned(),
            "constant folding"
        );
    }

    if config.deep_folding {
        let mut folder = DeepFolder::new();
        module = folder.visit_module(module);
        debug!(folded = folder.folded(), "deep folding");
    }

    module
}
