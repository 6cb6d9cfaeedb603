pub mod part;
pub mod request;
pub mod transaction;
pub mod user;

pub use part::Part;
pub use request::{RequestPriority, RequestStatus, StaffRequest};
pub use transaction::{
    StockDestination, StockSource, StockTransaction, TransactionStatus, TransactionType,
};
pub use user::{Role, User, UserStatus};
