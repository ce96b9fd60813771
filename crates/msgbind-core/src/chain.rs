//! Resolution of the configuration chain for one interface

use crate::interface::MessageInterfaceId;
use crate::node::ConfigurationNode;
use std::sync::Arc;

/// Nodes that apply to `interface`, most specific first
///
/// The root always applies. A child is entered only when the interface
/// scope starts with the child's scope, and its own children are checked
/// the same way. The result is ordered by scope length, longest first,
/// with ties broken by node name.
#[must_use]
pub fn resolve_chain(root: &Arc<ConfigurationNode>, interface: &MessageInterfaceId) -> Vec<Arc<ConfigurationNode>> {
    let mut chain = vec![Arc::clone(root)];
    collect_matching(root, interface.scope(), &mut chain);
    chain.sort_by(|a, b| {
        b.scope()
            .len()
            .cmp(&a.scope().len())
            .then_with(|| a.name().cmp(b.name()))
    });
    chain
}

fn collect_matching(node: &ConfigurationNode, scope: &str, chain: &mut Vec<Arc<ConfigurationNode>>) {
    for child in node.children() {
        if scope.starts_with(child.scope()) {
            chain.push(Arc::clone(child));
            collect_matching(child, scope, chain);
        }
    }
}
