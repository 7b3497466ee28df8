use capsule_map::{Capsule, CapsuleMap, Handle, MapError, SparseCapsuleArray, Transportable, Value};
use std::any::Any;

// A stand-in for an object only the host process knows how to build
#[derive(Debug)]
struct Intent {
    action: String,
}

impl Transportable for Intent {
    fn descriptor(&self) -> &str {
        "Intent"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct Socket {
    port: u16,
}

fn build_state() -> CapsuleMap {
    let mut settings = CapsuleMap::new();
    settings.set_bool("dark_mode", true);
    settings.set_int_array("recent", [3, 1, 4]);

    let mut pages = SparseCapsuleArray::new();
    pages.insert(0, Capsule::new(Intent { action: "VIEW".into() }));

    let mut state = CapsuleMap::new();
    state.set_map("settings", settings);
    state.set_handle("socket", Handle::new(Socket { port: 8080 }));
    state.set_text_list("history", ["home", "search"]);
    state.set_capsule("pending", Capsule::new(Intent { action: "SEND".into() }));
    state.set_sparse_capsule_array("pages", pages);
    state
}

fn main() -> Result<(), MapError> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("capsule_map=trace"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .init();

    let state = build_state();
    let mut snapshot = state.deep_copy();

    // Mutate the snapshot's nested settings without touching the original
    let mut settings = snapshot.get_map("settings").cloned().unwrap_or_default();
    if let Some(Value::IntArray(recent)) = settings.get_mut("recent") {
        recent.push(1);
    }
    snapshot.set_map("settings", settings);

    println!("original recent: {:?}", state.get_map("settings").and_then(|s| s.get_int_array("recent")));
    println!("snapshot recent: {:?}", snapshot.get_map("settings").and_then(|s| s.get_int_array("recent")));

    let same_socket = state
        .get_handle("socket")
        .zip(snapshot.get_handle("socket"))
        .is_some_and(|(a, b)| a.ptr_eq(b));
    println!("socket shared: {}", same_socket);
    if let Some(socket) = snapshot.get_handle("socket").and_then(|h| h.downcast_ref::<Socket>()) {
        println!("socket port: {}", socket.port);
    }

    if let Some(pending) = snapshot.get_capsule("pending") {
        if let Some(intent) = pending.downcast_ref::<Intent>() {
            println!("pending {} action: {}", pending.descriptor(), intent.action);
        }
    }

    // Reading a list as integers succeeds, its elements do not
    let history = snapshot.try_get_as::<capsule_map::TypedList<i32>>("history")?;
    match history.to_vec() {
        Ok(items) => println!("history as integers: {:?}", items),
        Err(e) => println!("history as integers: {}", e),
    }

    match snapshot.try_get_as::<&[i32]>("history") {
        Ok(items) => println!("history as array: {:?}", items),
        Err(e) => println!("history as array: {}", e),
    }

    Ok(())
}
