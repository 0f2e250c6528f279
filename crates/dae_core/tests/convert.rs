//! End-to-end conversion of documents on disk.

use std::path::PathBuf;

use dae_core::document::DocumentError;
use dae_core::{convert, convert_with_options, ConvertError, DrawRange, LayoutPolicy, ReaderOptions};
use dae_math::{UpAxis, Vec3};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("dae_core_test_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn converts_cube_fixture() {
    let _ = env_logger::builder().is_test(true).try_init();

    let reader = convert(fixture("cube.dae")).unwrap();

    assert_eq!(reader.up_axis(), UpAxis::Y);
    assert_eq!(reader.geometry_count(), 2);
    // position + normal + texcoord
    assert_eq!(reader.layout_width(), 8);

    let cube = reader.find("Cube").unwrap();
    assert_eq!(cube.unique_vertex_count, 24);
    assert_eq!(cube.corner_count(), 36);
    assert_eq!(cube.index_base, 0);
    assert_eq!(cube.draw_ranges, vec![DrawRange { offset: 0, count: 36 }]);

    // First corner: position 0, normal (0 0 -1) swapped to Y, uv (0 0)
    assert_eq!(
        cube.vertex(0),
        Some(&[-1.0, -1.0, -1.0, 0.0, -1.0, 0.0, 0.0, 0.0][..])
    );

    let bounds = cube.bounds();
    assert_eq!(bounds.min, Vec3::splat(-1.0));
    assert_eq!(bounds.max, Vec3::splat(1.0));
}

#[test]
fn later_geometry_is_padded_and_continues_namespace() {
    let reader = convert(fixture("cube.dae")).unwrap();

    let marker = reader.find("Marker").unwrap();
    assert_eq!(marker.vertex_width, 8);
    assert_eq!(marker.index_base, 24);
    assert_eq!(marker.index_buffer, vec![24, 25, 26]);
    assert_eq!(marker.draw_ranges, vec![DrawRange { offset: 36, count: 3 }]);

    // 2.00000004 rounds to 2, then Y and Z swap
    assert_eq!(
        marker.vertex(0),
        Some(&[0.25, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0][..])
    );
}

#[test]
fn combined_buffers_are_consistent() {
    let reader = convert(fixture("cube.dae")).unwrap();

    let vertices = reader.combined_vertex_buffer();
    let indices = reader.combined_index_buffer();
    assert_eq!(vertices.len(), reader.vertex_count() * reader.layout_width());
    assert_eq!(indices.len(), reader.index_count());
    assert!(indices.iter().all(|&i| (i as usize) < reader.vertex_count()));

    // Cube plus the marker lifted to z = 2.5 by the Y-up swap
    let bounds = reader.bounds();
    assert_eq!(bounds.min, Vec3::splat(-1.0));
    assert_eq!(bounds.max, Vec3::new(1.0, 1.0, 2.5));

    for geometry in reader.geometries() {
        assert_eq!(geometry.vertex_bytes().len(), geometry.vertex_buffer.len() * 4);
        assert_eq!(geometry.index_bytes().len(), geometry.index_buffer.len() * 4);
    }
}

#[test]
fn options_from_json_file() {
    let options = ReaderOptions::from_json_file(fixture("options.json")).unwrap();
    assert_eq!(options.float_precision, 3);
    assert_eq!(options.layout_policy, LayoutPolicy::Lenient);

    let reader = convert_with_options(fixture("cube.dae"), &options).unwrap();
    assert_eq!(reader.options(), &options);
    assert_eq!(reader.vertex_count(), 27);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = temp_dir("missing");
    let err = convert(dir.join("nope.dae")).unwrap_err();
    assert!(matches!(err, ConvertError::Document(DocumentError::Io(_))));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn rejects_non_collada_documents() {
    let dir = temp_dir("not_collada");

    let path = dir.join("scene.xml");
    std::fs::write(&path, "<scene><node/></scene>").unwrap();
    let err = convert(&path).unwrap_err();
    assert!(matches!(err, ConvertError::Document(DocumentError::NotCollada(_))));

    let path = dir.join("broken.dae");
    std::fs::write(&path, "<COLLADA><library_geometries>").unwrap();
    let err = convert(&path).unwrap_err();
    assert!(matches!(err, ConvertError::Document(DocumentError::Xml(_))));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn converts_document_written_to_disk() {
    let dir = temp_dir("written");
    let path = dir.join("triangle.dae");
    std::fs::write(
        &path,
        r#"<COLLADA xmlns="http://www.collada.org/2005/11/COLLADASchema" version="1.4.1">
  <library_geometries>
    <geometry id="Tri-mesh">
      <mesh>
        <source id="Tri-mesh-positions"><float_array>0 0 0 1 0 0 0 1 0</float_array></source>
        <triangles count="1"><input semantic="VERTEX" offset="0"/><p>0 1 2</p></triangles>
      </mesh>
    </geometry>
  </library_geometries>
</COLLADA>"#,
    )
    .unwrap();

    let reader = convert(&path).unwrap();
    assert_eq!(reader.up_axis(), UpAxis::Z);
    assert_eq!(reader.layout_width(), 3);
    assert_eq!(reader.geometries()[0].label(), "Tri-mesh");
    assert_eq!(reader.combined_index_buffer(), vec![0, 1, 2]);

    reader.release();
    let _ = std::fs::remove_dir_all(&dir);
}
