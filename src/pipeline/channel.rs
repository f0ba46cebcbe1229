use tokio::sync::mpsc;

pub type Sender<T> = mpsc::UnboundedSender<T>;
pub type Receiver<T> = mpsc::UnboundedReceiver<T>;

/// Create an unbounded single-producer/single-consumer channel.
pub fn create_channel<T>() -> (Sender<T>, Receiver<T>) {
    mpsc::unbounded_channel()
}
