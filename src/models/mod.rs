//! PayPal Orders v2 and Payments v2 data models.

pub mod order;
pub mod request;

pub use order::{
    Authorization, Capture, Link, Money, Order, OrderIntent, OrderStatus, Payments, PurchaseUnit,
    Refund,
};
pub use request::{
    CaptureRequest, CreateOrderRequest, PatchOp, PatchOperation, PurchaseUnitRequest,
    RefundRequest,
};
