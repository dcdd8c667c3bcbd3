//! # Kairo
//!
//! The state engine behind a visual call-flow editor: a typed node graph of
//! conversation steps, function calls, transfers, digit prompts and call
//! endings, with snapshot-based undo/redo, durable persistence, smart node
//! placement and a batch protocol for applying externally authored (usually
//! LLM-proposed) edits.
//!
//! The [`store::FlowStore`] is the single source of truth. Every mutation
//! goes through one of its operations, each of which enforces the graph's
//! invariants: unique IDs, protected anchor nodes, and the pairing of a
//! node's transition list with its output slot count.
//!
//! ## Quick Start
//!
//! ```
//! use kairo::prelude::*;
//!
//! let mut store = FlowStore::new();
//! let id = store.create_node(NodeKind::Conversation, Position { x: 400.0, y: 250.0 });
//!
//! assert!(store.undo());
//! assert!(store.node(&id).is_none());
//! assert!(store.redo());
//!
//! store.connect("start", &id, Some("output-0"));
//!
//! let mut storage = MemoryStorage::new();
//! persist(&store, &mut storage).unwrap();
//! let restored = rehydrate(&storage);
//! assert_eq!(restored.nodes().len(), store.nodes().len());
//! ```

pub mod actions;
pub mod error;
pub mod flow;
pub mod persist;
pub mod placement;
pub mod prelude;
pub mod store;
