use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// A single named API operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub name: String,
    pub url: String,
    pub method: HttpMethod,
    pub auth_required: bool,
}

/// Immutable table of operations, split into public and private namespaces.
///
/// Whether an operation needs authentication is decided solely by which
/// namespace it was registered in.
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    public: HashMap<String, OperationDescriptor>,
    private: HashMap<String, OperationDescriptor>,
}

impl OperationRegistry {
    pub fn builder(base_url: impl Into<String>) -> OperationRegistryBuilder {
        OperationRegistryBuilder {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            registry: Self::default(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&OperationDescriptor> {
        self.private.get(name).or_else(|| self.public.get(name))
    }

    pub fn is_private(&self, name: &str) -> bool {
        self.private.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.public.len() + self.private.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All operation names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .public
            .keys()
            .chain(self.private.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }
}

pub struct OperationRegistryBuilder {
    base_url: String,
    registry: OperationRegistry,
}

impl OperationRegistryBuilder {
    fn descriptor(&self, name: &str, method: HttpMethod, path: &str, auth_required: bool) -> OperationDescriptor {
        OperationDescriptor {
            name: name.to_string(),
            url: format!("{}{}", self.base_url, path),
            method,
            auth_required,
        }
    }

    /// Register an operation that needs no authentication
    #[must_use]
    pub fn public(mut self, name: &str, method: HttpMethod, path: &str) -> Self {
        let descriptor = self.descriptor(name, method, path, false);
        self.registry.private.remove(name);
        self.registry.public.insert(name.to_string(), descriptor);
        self
    }

    /// Register an operation that must be signed
    #[must_use]
    pub fn private(mut self, name: &str, method: HttpMethod, path: &str) -> Self {
        let descriptor = self.descriptor(name, method, path, true);
        self.registry.public.remove(name);
        self.registry.private.insert(name.to_string(), descriptor);
        self
    }

    pub fn build(self) -> OperationRegistry {
        self.registry
    }
}
