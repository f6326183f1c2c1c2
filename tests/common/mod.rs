use std::sync::{Arc, Mutex};

/// Returns a recording slot and a drain function for asserting what arrived.
#[allow(unused)]
pub fn recorder<T: Clone + Send + Sync + 'static>(
) -> (Box<dyn Fn(&T) + Send + Sync>, Box<dyn Fn() -> Vec<T> + Send + Sync>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let slot = {
        let seen = seen.clone();
        Box::new(move |value: &T| {
            seen.lock().unwrap().push(value.clone());
        })
    };

    let drain = Box::new(move || {
        let values: Vec<T> = seen.lock().unwrap().drain(..).collect();
        values
    });

    (slot, drain)
}

/// Sleeps long enough for a worker queue to drain in tests.
#[allow(unused)]
pub fn settle() {
    std::thread::sleep(std::time::Duration::from_millis(200));
}
