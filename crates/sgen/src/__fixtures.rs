use crate::PropertyMap;

/// Build a property map from `(name, value)` pairs.
pub fn property_map(entries: &[(&str, i32)]) -> PropertyMap {
	let mut properties = PropertyMap::new();
	for (name, value) in entries {
		properties.set(*name, *value);
	}

	properties
}

/// A piece file contributing lighting pieces. Its `@foreach` is expanded
/// before collection, so the captured bodies depend on `num_lights`.
pub const LIGHTING_PIECES: &str = "\
@piece(DeclLightParams)
struct Light
{
	vec4 position;
	vec4 diffuse;
};
uniform Light lights[8];
@end
@piece(ComputeLighting)
@foreach(n, 0, num_lights)
	color += computeLight( lights[@n], normal );
@end
@end
";

/// A pixel-shader template exercising conditional blocks and piece
/// insertion.
pub const PIXEL_SHADER_TEMPLATE: &str = "\
#version 450

@insertpiece(DeclLightParams)
@property(diffuse_map)
uniform sampler2D diffuseMap;
@end

void main()
{
	vec3 color = vec3( 0.0 );
	vec3 normal = vec3( 0.0, 1.0, 0.0 );
@property(lighting)
@insertpiece(ComputeLighting)
@end
	outColor = vec4( color, 1.0 );
}
";
