//! State graph resolution from class path resources.

use crate::error::BuildError;
use crate::loader::ClassLoader;
use metro_state::{State, StateDecoder};
use std::sync::Arc;

/// Locates and decodes the `.xgraph` resource that accompanies a class.
///
/// A class without a graph resource resolves to the shared null graph, so
/// resolving the same class twice without a resource yields the same
/// [`Arc`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StateResolver;

impl StateResolver {
    /// Returns the graph resource path for `classname`.
    ///
    /// ```
    /// use metro_builder::StateResolver;
    ///
    /// assert_eq!(StateResolver::resource_path("acme.Widget"), "acme/Widget.xgraph");
    /// ```
    #[must_use]
    pub fn resource_path(classname: &str) -> String {
        format!("{}.xgraph", classname.replace('.', "/"))
    }

    /// Resolves the state graph declared for `classname`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::StateGraph`] naming the resource if it exists
    /// but cannot be decoded, and [`BuildError::Resource`] if it cannot be
    /// read.
    pub fn resolve_state_graph(
        &self,
        classname: &str,
        loader: &dyn ClassLoader,
    ) -> Result<Arc<State>, BuildError> {
        let path = Self::resource_path(classname);
        let resource = loader
            .resource(&path)
            .map_err(|source| BuildError::Resource {
                resource: path.clone(),
                source,
            })?;
        let Some(resource) = resource else {
            tracing::trace!(class = classname, "no state graph resource, using null state");
            return Ok(State::null());
        };
        let graph = StateDecoder::parse_str(&resource.content).map_err(|source| {
            BuildError::StateGraph {
                resource: resource.uri.clone(),
                source,
            }
        })?;
        tracing::debug!(
            class = classname,
            resource = %resource.uri,
            states = graph.states().len(),
            "resolved state graph"
        );
        Ok(Arc::new(graph))
    }
}
