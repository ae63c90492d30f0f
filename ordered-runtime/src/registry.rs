use crate::behavior::BehaviorRegistration;

/// Global distributed slice collecting every `#[ordered]` impl block in the binary
#[linkme::distributed_slice]
pub static ORDERED_BEHAVIORS: [fn() -> BehaviorRegistration] = [..];
