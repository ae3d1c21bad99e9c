use async_trait::async_trait;
use object_types::DataMessage;

use crate::context::ObjectArgs;

/// Callbacks an object registers with its [`Bridge`](crate::Bridge).
#[async_trait]
pub trait ObjectHandler: Send + Sync {
    /// A data message arrived for this instance.
    ///
    /// Runs detached through the bridge's spawner; the dispatcher does not
    /// wait for it.
    async fn on_data_message(&self, message: DataMessage, args: ObjectArgs);

    /// The host pushed fresh context without a data message.
    fn on_args_change(&self, _args: ObjectArgs) {}
}
