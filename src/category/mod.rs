pub mod bdt;
pub mod fewz;
pub mod geometry;
pub mod kind;
pub mod node;
pub mod registry;
pub mod run1;
pub mod run2;
pub mod synch;
pub mod tree;

pub use self::bdt::BdtCategorizer;
pub use self::fewz::FewzCategorizer;
pub use self::geometry::{GeometryCuts, MuonGeometry};
pub use self::kind::{build_categorizer, CategorizerKind};
pub use self::node::{CategoryNode, CategoryTree, NodeId};
pub use self::registry::{Category, CategoryMap};
pub use self::run1::Run1Categorizer;
pub use self::run2::Run2Categorizer;
pub use self::synch::SynchCategorizer;
pub use self::tree::TreeCategorizer;

use crate::vars::VarSet;
use dyn_clone::DynClone;

/// Assigns each event to a set of registered categories.
///
/// The driving loop calls [`Categorizer::reset`] once per event before
/// [`Categorizer::evaluate`], then reads the flags. Evaluation only flips
/// flags of keys registered at construction.
pub trait Categorizer: DynClone + Send + Sync {
    fn categories(&self) -> &CategoryMap;

    fn categories_mut(&mut self) -> &mut CategoryMap;

    fn evaluate(&mut self, vars: &VarSet);

    fn reset(&mut self) {
        self.categories_mut().reset();
    }

    /// Panics if `key` was never registered.
    fn is_in(&self, key: &str) -> bool {
        self.categories().is_in(key)
    }

    fn output_results(&self) -> String {
        self.categories().output_results()
    }
}

// a loaded prototype is copied once per worker
dyn_clone::clone_trait_object!(Categorizer);
