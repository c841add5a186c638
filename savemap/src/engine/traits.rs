//! Collaborator traits for the parsing engine and its detection module.
//!
//! The engine is opaque: implementations typically forward each call to an
//! isolated worker and await the reply. No call reports intermediate
//! progress.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use super::error::EngineError;
use super::kind::GameKind;
use super::types::{FullAnalysis, ProvinceColors};
use crate::assets::{GameVersion, ProvinceIndex};

/// Native save parsing engine.
pub trait ParsingEngine: Send + Sync {
    /// Opaque handle to a parsed save living inside the engine.
    type Handle: Clone + Send + Sync + 'static;

    /// Metadata produced by the full pass.
    type Meta: Send + Sync + 'static;

    /// Load the engine module for `kind`.
    ///
    /// Callers memoize this; implementations may assume it succeeds at most
    /// once per kind.
    fn initialize(&self, kind: GameKind) -> impl Future<Output = Result<(), EngineError>> + Send;

    /// Parse a complete save buffer.
    fn parse(
        &self,
        kind: GameKind,
        data: Bytes,
    ) -> impl Future<Output = Result<Self::Handle, EngineError>> + Send;

    /// Game version the save declares.
    fn query_version(
        &self,
        handle: &Self::Handle,
    ) -> impl Future<Output = Result<GameVersion, EngineError>> + Send;

    /// Cheap first pass producing province colors.
    fn coarse_pass(
        &self,
        handle: &Self::Handle,
        game_data: Bytes,
        index: &ProvinceIndex,
    ) -> impl Future<Output = Result<ProvinceColors, EngineError>> + Send;

    /// Expensive pass producing final metadata and achievements.
    fn full_pass(
        &self,
        handle: &Self::Handle,
    ) -> impl Future<Output = Result<FullAnalysis<Self::Meta>, EngineError>> + Send;

    /// Convert the save to its plaintext form.
    fn melt(&self, handle: &Self::Handle) -> impl Future<Output = Result<Bytes, EngineError>> + Send;

    /// Free the engine-side resources behind `handle`.
    fn release(&self, handle: Self::Handle) -> impl Future<Output = ()> + Send;
}

/// Content sniffing for saves whose file name does not reveal the game.
pub trait TypeDetector: Send + Sync {
    /// Load the detection module. Memoized by the caller.
    fn initialize(&self) -> Pin<Box<dyn Future<Output = Result<(), EngineError>> + Send + '_>>;

    /// Identify the game from the save bytes.
    fn detect<'a>(
        &'a self,
        data: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Option<GameKind>> + Send + 'a>>;
}
