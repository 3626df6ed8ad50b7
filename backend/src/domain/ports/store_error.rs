//! Errors shared by every persistence port.
use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by store adapters.
    pub enum StoreError {
        /// Store connection could not be established.
        Connection { message: String } => "store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "store query failed: {message}",
        /// A unique constraint rejected the write; `field` names the column.
        Conflict { field: String } => "{field} already exists",
        /// A foreign key rejected the write; `field` names the referencing
        /// column.
        MissingReference { field: String } => "referenced {field} does not exist",
    }
}
