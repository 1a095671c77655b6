//! `setTimeout`-backed [`Scheduler`].
//!
//! Repeating tasks are chained one-shot timeouts rather than `setInterval`,
//! so a task can cancel itself from inside its own callback.
//!
//! Each armed timeout owns its `Closure`, so cancelling a task frees it. A
//! closure that is firing is parked in `spent` until the next callback, since
//! it must outlive its own invocation.

use std::collections::HashMap;

use tracing::error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::schedule::{Scheduler, Task, TaskId};

type Callback = Closure<dyn FnMut()>;

struct Armed {
    task: Task,
    handle: i32,
    period_ms: Option<u32>,
    callback: Callback,
}

pub struct BrowserScheduler {
    window: Window,
    next_id: u64,
    armed: HashMap<TaskId, Armed>,
    spent: Vec<Callback>,
}

impl BrowserScheduler {
    pub fn new(window: Window) -> Self {
        Self { window, next_id: 0, armed: HashMap::new(), spent: Vec::new() }
    }

    fn arm(&self, id: TaskId, delay_ms: u32) -> Option<(i32, Callback)> {
        let callback = Closure::wrap(Box::new(move || super::fire(id)) as Box<dyn FnMut()>);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay_ms as i32,
            ) {
            Ok(handle) => Some((handle, callback)),
            Err(err) => {
                error!(?id, ?err, "setTimeout failed");
                None
            }
        }
    }

    fn insert(&mut self, task: Task, delay_ms: u32, period_ms: Option<u32>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        if let Some((handle, callback)) = self.arm(id, delay_ms) {
            self.armed.insert(id, Armed { task, handle, period_ms, callback });
        }
        id
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&mut self, task: Task, delay_ms: u32) -> TaskId {
        self.insert(task, delay_ms, None)
    }

    fn schedule_repeating(&mut self, task: Task, period_ms: u32) -> TaskId {
        self.insert(task, period_ms, Some(period_ms))
    }

    fn cancel(&mut self, id: TaskId) {
        if let Some(armed) = self.armed.remove(&id) {
            self.window.clear_timeout_with_handle(armed.handle);
        }
    }

    fn cancel_all(&mut self) {
        for (_, armed) in self.armed.drain() {
            self.window.clear_timeout_with_handle(armed.handle);
        }
    }

    fn take_due(&mut self, id: TaskId) -> Option<Task> {
        // Every closure parked here has already returned.
        self.spent.clear();
        let mut armed = self.armed.remove(&id)?;
        let task = armed.task;
        if let Some(period) = armed.period_ms {
            if let Some((handle, callback)) = self.arm(id, period) {
                armed.handle = handle;
                let fired = std::mem::replace(&mut armed.callback, callback);
                self.spent.push(fired);
                self.armed.insert(id, armed);
                return Some(task);
            }
        }
        self.spent.push(armed.callback);
        Some(task)
    }
}

impl Drop for BrowserScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
