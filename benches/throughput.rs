use async_trait::async_trait;
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use slcmd::platform::User;
use slcmd::{Command, Config, Context, Dispatcher, Flow, Layer, MemoryPlatform, Middleware};

// Dispatch overhead against the in-memory platform: prefix resolution,
// tokenizing, lookup, middleware and a command that does nothing.

struct Noop;

#[async_trait]
impl Command for Noop {
    fn invocations(&self) -> Vec<&str> {
        vec!["noop"]
    }

    fn executable_in_dm(&self) -> bool {
        true
    }

    async fn execute(&self, _ctx: &mut Context<'_>) -> anyhow::Result<()> {
        Ok(())
    }
}

struct PassThrough;

#[async_trait]
impl Middleware for PassThrough {
    fn layer(&self) -> Layer {
        Layer::BOTH
    }

    async fn handle(
        &self,
        _command: &dyn Command,
        _ctx: &mut Context<'_>,
        _layer: Layer,
    ) -> anyhow::Result<Flow> {
        Ok(Flow::Continue)
    }
}

fn dispatch_benchmark(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let platform = MemoryPlatform::with_defaults("bot");
    let author = User {
        id: "u1".to_string(),
        username: "alice".to_string(),
        bot: false,
    };

    let bare = Dispatcher::builder(Config::default())
        .command(Noop)
        .unwrap()
        .build();
    let layered = Dispatcher::builder(Config::default())
        .command(Noop)
        .unwrap()
        .middleware(PassThrough)
        .middleware(PassThrough)
        .build();

    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    let command = platform.compose("c1", &author, r#"!noop "John Doe" 10"#);
    group.bench_function("command", |b| {
        b.to_async(&rt)
            .iter(|| async { bare.dispatch(&platform, &command, false).await })
    });
    group.bench_function("command_with_middleware", |b| {
        b.to_async(&rt)
            .iter(|| async { layered.dispatch(&platform, &command, false).await })
    });

    let chatter = platform.compose("c1", &author, "just talking, no command here");
    group.bench_function("no_prefix", |b| {
        b.to_async(&rt)
            .iter(|| async { bare.dispatch(&platform, &chatter, false).await })
    });

    group.finish();
}

criterion_group!(benches, dispatch_benchmark);
criterion_main!(benches);
