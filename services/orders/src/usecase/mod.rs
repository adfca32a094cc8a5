pub mod checkout;
pub mod history;
pub mod reconcile;
pub mod review;
