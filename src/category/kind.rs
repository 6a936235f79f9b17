use super::{
    BdtCategorizer, Categorizer, FewzCategorizer, Run1Categorizer, Run2Categorizer,
    SynchCategorizer, TreeCategorizer,
};
use crate::config::CutConfig;
use crate::error::{DfResult, DimuForgeError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CategorizerKind {
    Run1,
    Run2,
    Bdt,
    Tree,
    Synch,
    Fewz,
}

/// Builds a fresh categorizer. Every worker gets its own instance.
pub fn build_categorizer(
    kind: CategorizerKind,
    cuts: &CutConfig,
    tree_path: Option<&Path>,
) -> DfResult<Box<dyn Categorizer>> {
    let categorizer: Box<dyn Categorizer> = match kind {
        CategorizerKind::Run1 => Box::new(Run1Categorizer::new(cuts.run1.clone())),
        CategorizerKind::Run2 => Box::new(Run2Categorizer::new(cuts.run2.clone())),
        CategorizerKind::Bdt => Box::new(BdtCategorizer::new()),
        CategorizerKind::Synch => Box::new(SynchCategorizer::new(cuts.run1.clone())),
        CategorizerKind::Fewz => Box::new(FewzCategorizer::new(cuts.fewz.clone())),
        CategorizerKind::Tree => {
            let path = tree_path.ok_or_else(|| {
                DimuForgeError::Config("the tree categorizer needs --tree <file.xml>".into())
            })?;
            Box::new(TreeCategorizer::load_from_file(path)?)
        }
    };
    Ok(categorizer)
}
