// vim: tw=80
//! A factory that builds mocks with shared settings, and verifies them all at
//! once.

use std::sync::{Arc, Mutex, Weak};
use tracing::debug;

use crate::{
    Error,
    Result,
    chaos::ChaosPolicy,
    defaults::DefaultValue,
    interface::Catalog,
    lock,
    mock::{Behavior, Mock, MockBuilder, MockFactory}
};

/// Settings shared by every mock of a [`MockRepository`].
#[derive(Clone, Debug, Default)]
pub struct RepositoryConfig {
    pub behavior: Behavior,
    pub default_value: Option<DefaultValue>,
    pub catalog: Catalog,
    /// Each mock gets its own injector, so statistics are per mock.
    pub chaos: Option<ChaosPolicy>,
}

struct RepoInner {
    config: RepositoryConfig,
    mocks: Mutex<Vec<Mock>>,
}

impl RepoInner {
    fn track(&self, mock: Mock) -> Mock {
        lock(&self.mocks).push(mock.clone());
        mock
    }
}

impl MockFactory for RepoInner {
    fn create(&self, parent: &Mock, interface: &str, member: &str)
        -> Result<Mock>
    {
        let mock = parent.child_builder(interface)
            .name(&format!("{}.{}", parent.name(), member))
            .build();
        Ok(self.track(mock))
    }
}

/// Builds mocks, including nested ones, and keeps track of them all.
///
/// # Examples
/// ```
/// # use understudy::*;
/// let repo = MockRepository::new(Behavior::Loose);
/// let a = repo.create("IFoo");
/// let b = repo.create("IBar");
/// a.setup("Run", vec![]).verifiable();
/// b.setup("Run", vec![]).verifiable();
/// a.dispatch("Run", &[], ResultKind::None).unwrap();
/// let e = repo.verify_all().unwrap_err();
/// assert!(e.to_string().contains("Mock<IBar>"));
/// ```
pub struct MockRepository(Arc<RepoInner>);

impl MockRepository {
    pub fn new(behavior: Behavior) -> Self {
        Self::with_config(RepositoryConfig{behavior, ..Default::default()})
    }

    pub fn with_config(config: RepositoryConfig) -> Self {
        MockRepository(Arc::new(RepoInner {
            config,
            mocks: Mutex::new(Vec::new())
        }))
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.0.config
    }

    fn builder(&self, interface: &str) -> MockBuilder {
        let config = &self.0.config;
        let factory: Arc<dyn MockFactory> = self.0.clone();
        let weak: Weak<dyn MockFactory> = Arc::downgrade(&factory);
        let mut builder = Mock::builder(interface)
            .behavior(config.behavior)
            .catalog(config.catalog.clone())
            .weak_factory(weak);
        if let Some(dv) = config.default_value {
            builder = builder.default_value(dv);
        }
        if let Some(policy) = &config.chaos {
            builder = builder.chaos(policy.clone());
        }
        builder
    }

    /// A new mock of `interface` with the repository's settings.
    pub fn create(&self, interface: &str) -> Mock {
        self.create_with(interface, |b| b)
    }

    /// Like [`create`](#method.create), but `f` may adjust the settings of
    /// this one mock.
    pub fn create_with<F>(&self, interface: &str, f: F) -> Mock
        where F: FnOnce(MockBuilder) -> MockBuilder
    {
        let mock = f(self.builder(interface)).build();
        debug!(mock = %mock.name(), "repository created mock");
        self.0.track(mock)
    }

    /// Every mock created so far, nested ones included, in creation order.
    pub fn mocks(&self) -> Vec<Mock> {
        lock(&self.0.mocks).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.0.mocks).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn verify_each<F>(&self, f: F) -> Result<()>
        where F: Fn(&Mock) -> Result<()>
    {
        let failures = self.mocks()
            .iter()
            .filter_map(|m| f(m).err())
            .collect::<Vec<_>>();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Repository(failures))
        }
    }

    /// [`Mock::verify_all`] on every mock.  Reports every failing mock, not
    /// just the first.
    pub fn verify_all(&self) -> Result<()> {
        self.verify_each(Mock::verify_all)
    }

    pub fn verify_all_setups(&self) -> Result<()> {
        self.verify_each(Mock::verify_all_setups)
    }

    pub fn verify_no_other_calls(&self) -> Result<()> {
        self.verify_each(Mock::verify_no_other_calls)
    }

    pub fn reset_calls(&self) {
        for mock in self.mocks() {
            mock.reset_calls();
        }
    }
}
