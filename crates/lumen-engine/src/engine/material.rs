use super::context::Engine;
use super::error::EngineError;
use super::handle::Handle;

/// Entry points every material package must define.
pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// A validated material package: WGSL source following the engine's
/// binding interface.
///
/// Bindings provided by the renderer:
/// - `@group(0) @binding(0)`: view uniform, `mat4x4<f32>` clip-from-world
/// - `@group(1) @binding(0)`: object uniform, `mat4x4<f32>` world-from-model
///
/// Vertex inputs use the attribute semantic as `@location`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialPackage<'a> {
    source: &'a str,
}

impl<'a> MaterialPackage<'a> {
    pub fn parse(bytes: &'a [u8]) -> Result<Self, EngineError> {
        if bytes.is_empty() {
            return Err(EngineError::MaterialPackage("package is empty".into()));
        }

        let source = std::str::from_utf8(bytes)
            .map_err(|e| EngineError::MaterialPackage(format!("not UTF-8: {e}")))?;

        for entry in [VERTEX_ENTRY, FRAGMENT_ENTRY] {
            if !defines_fn(source, entry) {
                return Err(EngineError::MaterialPackage(format!("missing entry point `{entry}`")));
            }
        }

        Ok(Self { source })
    }

    pub fn source(&self) -> &'a str {
        self.source
    }
}

fn defines_fn(source: &str, name: &str) -> bool {
    source.match_indices("fn ").any(|(i, _)| {
        let rest = source[i + 3..].trim_start();
        rest.strip_prefix(name)
            .is_some_and(|tail| tail.trim_start().starts_with('('))
    })
}

/// Describes a material before it is created.
#[derive(Debug, Clone, Default)]
pub struct MaterialBuilder<'a> {
    package: Option<&'a [u8]>,
    name: Option<String>,
}

impl<'a> MaterialBuilder<'a> {
    pub fn package(mut self, bytes: &'a [u8]) -> Self {
        self.package = Some(bytes);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn build(self, engine: &mut Engine<'_>) -> Result<Handle<Material>, EngineError> {
        engine.create_material(self)
    }

    pub(crate) fn validate(&self) -> Result<(MaterialPackage<'a>, String), EngineError> {
        let bytes = self
            .package
            .ok_or_else(|| EngineError::builder("material", "no package"))?;
        let package = MaterialPackage::parse(bytes)?;
        let name = self.name.clone().unwrap_or_else(|| "material".to_string());
        Ok((package, name))
    }
}

/// A compiled material.
pub struct Material {
    pub(crate) name: String,
    pub(crate) module: wgpu::ShaderModule,
    pub(crate) default_instance: MaterialInstance,
}

impl Material {
    pub fn builder<'a>() -> MaterialBuilder<'a> {
        MaterialBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_instance(&self) -> MaterialInstance {
        self.default_instance
    }
}

/// Reference to a material plus its parameter set.
///
/// Materials here expose no parameters, so every instance renders like the
/// default one.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MaterialInstance {
    material: Handle<Material>,
}

impl MaterialInstance {
    pub(crate) fn new(material: Handle<Material>) -> Self {
        Self { material }
    }

    pub fn material(self) -> Handle<Material> {
        self.material
    }
}
