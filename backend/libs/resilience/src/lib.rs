/// Resilience helpers shared by backend services
///
/// - **Timeout**: every call to an external collaborator runs under a bound
/// - **Presets**: pre-tuned bounds for object storage, live push and database
///
/// # Example: Object Storage Delete with Timeout
///
/// ```rust,no_run
/// use resilience::{presets, timeout::with_timeout_result};
///
/// #[tokio::main]
/// async fn main() {
///     let config = presets::object_storage_delete();
///
///     let result = with_timeout_result(config.duration, async {
///         // Your storage call
///         Ok::<_, std::io::Error>(true)
///     })
///     .await;
/// }
/// ```

pub mod presets;
pub mod timeout;

pub use timeout::{with_timeout, with_timeout_result, TimeoutConfig, TimeoutError};
