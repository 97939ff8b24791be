#![no_main]

use calltrace::recorder::Recorder;
use calltrace::script::Script;
use calltrace::{EventKind, FrameContext, Runtime, TracerConfig};
use libfuzzer_sys::fuzz_target;
use std::cell::RefCell;
use std::rc::Rc;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    // Any script that parses must replay without unbalancing the recorder
    let Ok(script) = Script::from_json(input) else {
        return;
    };

    let config = TracerConfig::default();
    let recorder = Rc::new(RefCell::new(Recorder::with_registry(script.registry())));
    let shared = Rc::clone(&recorder);
    let mut rt = Runtime::new();
    if rt
        .register(Box::new(move |kind: EventKind, ctx: FrameContext<'_>| {
            shared.borrow_mut().observe(kind, ctx, &config)
        }))
        .is_err()
    {
        return;
    }
    script.replay(&mut rt);
    rt.deregister();

    assert_eq!(rt.stack_depth(), 0);
    assert_eq!(recorder.borrow().depth(), 0);
});
