//! # dnd-mcp
//!
//! MCP (Model Context Protocol) server for tabletop role-playing games.
//!
//! This crate exposes dice rolling and character/monster bookkeeping as tools for
//! AI agents. It implements the MCP protocol over stdin/stdout using JSON-RPC 2.0.
//!
//! ## Features
//!
//! - **Dice notation engine**: `1d20+5`, `2d3 + 1d6`, `3d8-1`, with a per-die breakdown
//! - **Character and monster rosters**: create, read, update, list and delete records
//!   with hit point and magic point validation
//! - **Selectable tool sets**: serve only dice, characters, monsters, or any mix
//!
//! ## Usage
//!
//! The server is typically run as an executable and configured in AI tools like Claude Desktop:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "dnd": {
//!       "command": "/path/to/dnd-mcp",
//!       "args": ["--tools", "dice,character,monster"]
//!     }
//!   }
//! }
//! ```
//!
//! ## Library Usage
//!
//! The dice engine can be used on its own:
//!
//! ```
//! use dnd_mcp::dice;
//!
//! let expr = dice::parse("2d8 + 1d6 + 3").unwrap();
//! assert_eq!(expr.groups().len(), 2);
//! assert_eq!(expr.groups()[1].modifier, 3);
//!
//! let outcome = dice::evaluate(&expr);
//! assert!((6..=25).contains(&outcome.total));
//! ```

#![warn(missing_docs)]

mod convert;
pub mod dice;
mod error;
pub mod roster;
mod server;
mod session;
mod tools;

pub use dice::{DiceError, DiceGroup, DieRoller, ParsedExpression, RollOutcome};
pub use error::{rpc_codes, McpError, Result};
pub use server::{JsonRpcRequest, JsonRpcResponse, McpServer};
pub use session::McpSession;
pub use tools::{ToolDef, ToolOutput, ToolRegistry, ToolSet};
