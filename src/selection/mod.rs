pub mod jets;

pub use self::jets::JetCleaner;
