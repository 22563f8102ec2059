use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for an element stored in the Core arena.
    ///
    /// Parent and host back-links are stored as `NodeId`s, so they never own
    /// anything and cannot keep a detached subtree alive.
    pub struct NodeId;
}
