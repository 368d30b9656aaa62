//! Call instrumentation - composable counting and history wrappers
//!
//! Each wrapper decorates a [`CacheOperation`] and persists its bookkeeping
//! in the operation's own store, keyed by the operation's qualified name:
//! the invocation counter under the name itself, the call history under
//! `<name>:inputs` / `<name>:outputs`. The wrappers compose in either order.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::store::KeyStore;
use crate::domain::{CacheValue, DomainError};

use super::identity::IdentityCache;

/// A cache operation that can be wrapped for instrumentation.
///
/// An operation exposes its qualified name and a handle to the store its
/// bookkeeping lives in. An operation without a store handle is not
/// instrumentable; wrappers pass it through untouched.
#[async_trait]
pub trait CacheOperation: Send + Sync {
    /// Qualified operation name, e.g. `IdentityCache::store`
    fn name(&self) -> &str;

    /// Store handle used for counters and history, if any
    fn store(&self) -> Option<&Arc<dyn KeyStore>>;

    /// Invokes the operation
    async fn invoke(&self, input: CacheValue) -> Result<String, DomainError>;
}

/// [`IdentityCache::store`] bound as a wrappable operation
#[derive(Debug, Clone)]
pub struct StoreOperation {
    cache: IdentityCache,
}

impl StoreOperation {
    pub fn new(cache: IdentityCache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl CacheOperation for StoreOperation {
    fn name(&self) -> &str {
        "IdentityCache::store"
    }

    fn store(&self) -> Option<&Arc<dyn KeyStore>> {
        Some(self.cache.store_handle())
    }

    async fn invoke(&self, input: CacheValue) -> Result<String, DomainError> {
        self.cache.store(input).await
    }
}

/// Wrapper that counts invocations of the inner operation.
///
/// The counter is incremented before delegation, exactly once per
/// invocation attempt: a failing delegate still counts as called.
#[derive(Debug, Clone)]
pub struct CountedOperation<O> {
    inner: O,
}

impl<O: CacheOperation> CountedOperation<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<O: CacheOperation> CacheOperation for CountedOperation<O> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn store(&self) -> Option<&Arc<dyn KeyStore>> {
        self.inner.store()
    }

    async fn invoke(&self, input: CacheValue) -> Result<String, DomainError> {
        if let Some(store) = self.inner.store() {
            store.increment(self.inner.name(), 1).await?;
        }

        self.inner.invoke(input).await
    }
}

/// Wrapper that records the inner operation's inputs and outputs.
///
/// The serialized argument is appended to `<name>:inputs` before delegation
/// and the return value to `<name>:outputs` after the delegate returns, so
/// index i of both lists describes call i. When the delegate fails, the
/// output append is skipped and the lists are left unbalanced; replay pairs
/// entries up to the shorter list.
#[derive(Debug, Clone)]
pub struct HistoryRecordingOperation<O> {
    inner: O,
}

impl<O: CacheOperation> HistoryRecordingOperation<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }
}

/// Key of the recorded inputs list for an operation name
pub(crate) fn inputs_key(name: &str) -> String {
    format!("{}:inputs", name)
}

/// Key of the recorded outputs list for an operation name
pub(crate) fn outputs_key(name: &str) -> String {
    format!("{}:outputs", name)
}

#[async_trait]
impl<O: CacheOperation> CacheOperation for HistoryRecordingOperation<O> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn store(&self) -> Option<&Arc<dyn KeyStore>> {
        self.inner.store()
    }

    async fn invoke(&self, input: CacheValue) -> Result<String, DomainError> {
        let Some(store) = self.inner.store() else {
            return self.inner.invoke(input).await;
        };

        let record = serde_json::to_vec(&input)
            .map_err(|e| DomainError::internal(format!("Failed to serialize input: {}", e)))?;
        store.push_list(&inputs_key(self.inner.name()), &record).await?;

        let output = self.inner.invoke(input).await?;

        store
            .push_list(&outputs_key(self.inner.name()), output.as_bytes())
            .await?;

        Ok(output)
    }
}

/// Writes the recorded call history of an operation to `out`.
///
/// Prints the invocation count followed by one `<name>(*<input>) -> <output>`
/// line per recorded call, in call order. An operation with no store handle
/// or no recorded counter is silently skipped: replay is a best-effort
/// diagnostic, not a data-path operation. Genuine store failures propagate.
pub async fn replay<W: Write>(
    op: &dyn CacheOperation,
    out: &mut W,
) -> Result<(), DomainError> {
    let Some(store) = op.store() else {
        return Ok(());
    };

    let name = op.name();

    let Some(count_bytes) = store.get(name).await? else {
        return Ok(());
    };

    let count: i64 = std::str::from_utf8(&count_bytes)
        .map_err(|e| DomainError::decode(format!("invalid counter for '{}': {}", name, e)))?
        .parse()
        .map_err(|e| DomainError::decode(format!("invalid counter for '{}': {}", name, e)))?;

    writeln!(out, "{} was called {} times:", name, count)
        .map_err(|e| DomainError::internal(format!("Failed to write replay output: {}", e)))?;

    let inputs = store.list_range(&inputs_key(name), 0, -1).await?;
    let outputs = store.list_range(&outputs_key(name), 0, -1).await?;

    for (input, output) in inputs.iter().zip(outputs.iter()) {
        let rendered_input = match serde_json::from_slice::<CacheValue>(input) {
            Ok(value) => value.to_string(),
            Err(_) => String::from_utf8_lossy(input).into_owned(),
        };

        writeln!(
            out,
            "{}(*{}) -> {}",
            name,
            rendered_input,
            String::from_utf8_lossy(output)
        )
        .map_err(|e| DomainError::internal(format!("Failed to write replay output: {}", e)))?;
    }

    Ok(())
}

/// [`replay`] to standard output
pub async fn replay_stdout(op: &dyn CacheOperation) -> Result<(), DomainError> {
    let mut stdout = std::io::stdout();
    replay(op, &mut stdout).await
}
